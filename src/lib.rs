pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use app::http::create_router;
pub use config::AppConfig;
pub use core::service::{LoadedArtifacts, PredictionService};
pub use domain::artifacts::ArtifactNames;
pub use domain::model::{EmployeeRecord, SalaryPrediction};
pub use utils::error::{PredictorError, Result};
