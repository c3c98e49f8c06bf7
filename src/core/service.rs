use crate::core::preprocessor::ColumnTransformer;
use crate::core::regressor::Model;
use crate::domain::artifacts::{ArtifactNames, FeatureInfo, ModelSpec, PreprocessorSpec};
use crate::domain::model::EmployeeRecord;
use crate::domain::ports::{ArtifactStore, FeatureTransformer, Regressor};
use crate::utils::error::{PredictorError, Result};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    model: Model,
    preprocessor: ColumnTransformer,
    feature_info: FeatureInfo,
}

impl LoadedArtifacts {
    /// Cross-checks the three artifacts against each other.
    pub fn new(model: Model, preprocessor: ColumnTransformer, feature_info: FeatureInfo) -> Result<Self> {
        if preprocessor.n_features_out() != model.n_features_in() {
            return Err(PredictorError::invalid_artifact(
                "model",
                format!(
                    "preprocessor produces {} features but the model expects {}",
                    preprocessor.n_features_out(),
                    model.n_features_in()
                ),
            ));
        }

        if let Some(names) = &feature_info.feature_names {
            if names.len() != model.n_features_in() {
                return Err(PredictorError::invalid_artifact(
                    "feature info",
                    format!(
                        "{} feature names listed but the model expects {}",
                        names.len(),
                        model.n_features_in()
                    ),
                ));
            }
        }

        let consumed: Vec<&str> = preprocessor.input_columns().collect();
        if let Some(column) = feature_info
            .numeric_features
            .iter()
            .chain(&feature_info.categorical_features)
            .find(|c| !consumed.contains(&c.as_str()))
        {
            return Err(PredictorError::invalid_artifact(
                "feature info",
                format!("column '{}' is not handled by the preprocessor", column),
            ));
        }

        Ok(Self {
            model,
            preprocessor,
            feature_info,
        })
    }
}

fn parse_artifact<T: DeserializeOwned>(artifact: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| PredictorError::invalid_artifact(artifact, e.to_string()))
}

async fn read_artifacts<S: ArtifactStore>(store: &S, names: &ArtifactNames) -> Result<LoadedArtifacts> {
    for name in [&names.model, &names.preprocessor, &names.features] {
        tracing::debug!("Reading artifact: {}", store.describe(name));
    }

    let model: ModelSpec = parse_artifact("model", &store.read_file(&names.model).await?)?;
    let preprocessor: PreprocessorSpec =
        parse_artifact("preprocessor", &store.read_file(&names.preprocessor).await?)?;
    let feature_info: FeatureInfo =
        parse_artifact("feature info", &store.read_file(&names.features).await?)?;

    LoadedArtifacts::new(
        Model::from_spec(model)?,
        ColumnTransformer::from_spec(preprocessor)?,
        feature_info,
    )
}

/// Facade over the loaded artifacts. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct PredictionService {
    artifacts: Option<LoadedArtifacts>,
}

impl PredictionService {
    /// Loads all three artifacts. Failures are logged and leave the service
    /// in the not-loaded state; every later prediction reports it.
    pub async fn load<S: ArtifactStore>(store: &S, names: &ArtifactNames) -> Self {
        match read_artifacts(store, names).await {
            Ok(artifacts) => {
                tracing::info!(
                    "✓ Model loaded successfully! ({}, {} input features)",
                    artifacts.feature_info.model_name,
                    artifacts.model.n_features_in()
                );
                let estimators = artifacts.model.estimator_names();
                if !estimators.is_empty() {
                    tracing::debug!("Voting estimators: {}", estimators.join(", "));
                }
                Self::with_artifacts(artifacts)
            }
            Err(e @ PredictorError::ArtifactNotFound { .. }) => {
                tracing::error!("❌ {}", e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                Self::not_loaded()
            }
            Err(e) => {
                tracing::error!("❌ Error loading model: {}", e);
                Self::not_loaded()
            }
        }
    }

    pub fn with_artifacts(artifacts: LoadedArtifacts) -> Self {
        Self {
            artifacts: Some(artifacts),
        }
    }

    pub fn not_loaded() -> Self {
        Self { artifacts: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.artifacts.is_some()
    }

    pub fn model_status(&self) -> &'static str {
        if self.is_loaded() {
            "loaded"
        } else {
            "not loaded"
        }
    }

    pub fn feature_info(&self) -> Option<&FeatureInfo> {
        self.artifacts.as_ref().map(|a| &a.feature_info)
    }

    /// Categories the preprocessor knows for a column, for prompts.
    pub fn category_options(&self, column: &str) -> Option<&[String]> {
        self.artifacts.as_ref()?.preprocessor.categories(column)
    }

    pub fn predict(&self, record: &EmployeeRecord) -> Result<f64> {
        let artifacts = self.artifacts.as_ref().ok_or(PredictorError::ModelNotLoaded)?;

        let features = artifacts.preprocessor.transform(record)?;
        let prediction = artifacts.model.predict(&features)?;

        tracing::debug!(
            age = record.age,
            years_experience = record.years_experience,
            job_title = %record.job_title,
            prediction,
            "Prediction made"
        );
        Ok(prediction)
    }
}
