pub mod cli;
pub mod toml_config;

use crate::config::cli::CommonArgs;
use crate::config::toml_config::TomlConfig;
use crate::domain::artifacts::ArtifactNames;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

/// Effective settings: command-line flags over the TOML file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: String,
    pub artifact_names: ArtifactNames,
    pub log_level: Option<String>,
    pub log_format: String,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifacts_dir: ".".to_string(),
            artifact_names: ArtifactNames::default(),
            log_level: None,
            log_format: "compact".to_string(),
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml(file: TomlConfig) -> Self {
        let defaults = Self::default();
        let names = defaults.artifact_names;
        Self {
            host: file.server.host.unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            artifacts_dir: file.artifacts.dir.unwrap_or(defaults.artifacts_dir),
            artifact_names: ArtifactNames {
                model: file.artifacts.model_file.unwrap_or(names.model),
                preprocessor: file.artifacts.preprocessor_file.unwrap_or(names.preprocessor),
                features: file.artifacts.features_file.unwrap_or(names.features),
            },
            log_level: file.logging.level,
            log_format: file.logging.format.unwrap_or(defaults.log_format),
            verbose: false,
        }
    }

    /// Reads the optional config file and applies the shared flags.
    pub fn load(common: &CommonArgs) -> Result<Self> {
        let file = match &common.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut config = Self::from_toml(file);
        if let Some(dir) = &common.artifacts_dir {
            config.artifacts_dir = dir.clone();
        }
        config.verbose = common.verbose;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_positive_number("server.port", self.port as usize, 1)?;
        validation::validate_path("artifacts.dir", &self.artifacts_dir)?;
        for (field, file) in [
            ("artifacts.model_file", &self.artifact_names.model),
            ("artifacts.preprocessor_file", &self.artifact_names.preprocessor),
            ("artifacts.features_file", &self.artifact_names.features),
        ] {
            validation::validate_path(field, file)?;
            validation::validate_file_extension(field, file, &["json"])?;
        }
        validation::validate_one_of("logging.format", &self.log_format, &LOG_FORMATS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 9000\n\n[artifacts]\ndir = \"/from/file\"\n")
            .unwrap();

        let common = CommonArgs {
            config: Some(temp_file.path().to_str().unwrap().to_string()),
            artifacts_dir: Some("/from/flag".to_string()),
            verbose: true,
        };
        let config = AppConfig::load(&common).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.artifacts_dir, "/from/flag");
        assert!(config.verbose);
    }

    #[test]
    fn test_validation_failures() {
        let config = AppConfig {
            port: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.artifact_names.model = "model.pkl".to_string();
        assert!(config.validate().is_err());

        let config = AppConfig {
            log_format: "pretty".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let common = CommonArgs {
            config: Some("/nonexistent/salary-predictor.toml".to_string()),
            ..CommonArgs::default()
        };
        assert!(AppConfig::load(&common).is_err());
    }
}
