use crate::domain::ports::ArtifactStore;
use crate::utils::error::{PredictorError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl ArtifactStore for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        match tokio::fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PredictorError::ArtifactNotFound {
                path: full_path.display().to_string(),
            }),
            Err(e) => Err(PredictorError::IoError(e)),
        }
    }

    fn describe(&self, path: &str) -> String {
        self.base_path.join(path).display().to_string()
    }
}
