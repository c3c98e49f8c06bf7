use crate::domain::model::EmployeeRecord;
use crate::utils::error::Result;

pub trait ArtifactStore: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Human-readable location of `path`, used in log and error messages.
    fn describe(&self, path: &str) -> String;
}

/// Turns one employee record into the model's numeric feature vector.
pub trait FeatureTransformer: Send + Sync {
    fn transform(&self, record: &EmployeeRecord) -> Result<Vec<f64>>;
    fn n_features_out(&self) -> usize;
}

pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64>;
    fn n_features_in(&self) -> usize;
}
