#![allow(dead_code)]

use salary_predictor::{ArtifactNames, LocalStorage, PredictionService};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

pub fn preprocessor_json() -> Value {
    json!({
        "transformers": [
            {
                "kind": "standard_scaler",
                "columns": ["Age", "Years of Experience"],
                "mean": [30.0, 5.0],
                "scale": [10.0, 5.0]
            },
            {
                "kind": "one_hot",
                "columns": ["Gender", "Education Level", "Job Title"],
                "categories": [
                    ["Female", "Male"],
                    ["Bachelor's", "Master's", "PhD"],
                    ["Data Scientist", "Manager", "Software Engineer"]
                ],
                "handle_unknown": "ignore"
            }
        ]
    })
}

/// Voting of a linear model and a one-split tree on scaled experience.
///
/// 40y / 10y exp / Male / PhD / Manager  -> (145000.125 + 120000) / 2 = 132500.0625
/// 30y / 0y exp / Female / Bachelor's / Data Scientist -> (70000.125 + 60000) / 2 = 65000.0625
pub fn model_json() -> Value {
    json!({
        "kind": "voting",
        "estimators": [
            {
                "name": "linear",
                "model": {
                    "kind": "linear",
                    "coef": [10000.0, 20000.0, 0.0, 0.0, 0.0, 5000.0, 15000.0, 10000.0, 20000.0, 5000.0],
                    "intercept": 80000.125
                }
            },
            {
                "name": "tree",
                "model": {
                    "kind": "decision_tree",
                    "n_features": 10,
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [1, -2, -2],
                    "threshold": [0.0, -2.0, -2.0],
                    "value": [90000.0, 60000.0, 120000.0]
                }
            }
        ]
    })
}

pub fn features_json() -> Value {
    json!({
        "model_name": "Voting Regressor",
        "numeric_features": ["Age", "Years of Experience"],
        "categorical_features": ["Gender", "Education Level", "Job Title"],
        "feature_names": [
            "num__Age", "num__Years of Experience",
            "cat__Gender_Female", "cat__Gender_Male",
            "cat__Education Level_Bachelor's", "cat__Education Level_Master's", "cat__Education Level_PhD",
            "cat__Job Title_Data Scientist", "cat__Job Title_Manager", "cat__Job Title_Software Engineer"
        ],
        "target": "Salary",
        "metrics": {"r2": 0.91, "rmse": 15234.5}
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Writes the three default-named artifacts into a fresh directory.
pub fn artifact_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let names = ArtifactNames::default();
    write_json(dir.path(), &names.model, &model_json());
    write_json(dir.path(), &names.preprocessor, &preprocessor_json());
    write_json(dir.path(), &names.features, &features_json());
    dir
}

pub async fn loaded_service() -> PredictionService {
    let dir = artifact_dir();
    let storage = LocalStorage::new(dir.path());
    PredictionService::load(&storage, &ArtifactNames::default()).await
}

pub fn senior_request() -> Value {
    json!({
        "age": 40,
        "years_experience": 10,
        "gender": "Male",
        "education_level": "PhD",
        "job_title": "Manager"
    })
}

pub fn junior_request() -> Value {
    json!({
        "age": 30,
        "years_experience": 0,
        "gender": "Female",
        "education_level": "Bachelor's",
        "job_title": "Data Scientist"
    })
}
