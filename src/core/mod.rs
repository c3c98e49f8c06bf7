pub mod preprocessor;
pub mod regressor;
pub mod service;
