mod common;

use salary_predictor::domain::model::{EDUCATION_LEVEL, GENDER, JOB_TITLE};
use salary_predictor::{ArtifactNames, EmployeeRecord, LocalStorage, PredictionService, SalaryPrediction};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_and_predict() {
    let service = common::loaded_service().await;
    assert!(service.is_loaded());

    let info = service.feature_info().unwrap();
    assert_eq!(info.model_name, "Voting Regressor");
    assert_eq!(info.target.as_deref(), Some("Salary"));

    let record = EmployeeRecord::new(40.0, 10.0, "Male", "PhD", "Manager");
    let value = service.predict(&record).unwrap();
    assert_eq!(value, 132500.0625);
    assert_eq!(
        SalaryPrediction::from_value(value),
        SalaryPrediction {
            predicted_salary: 132500.06,
            formatted_salary: "$132,500.06".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unknown_categories_are_ignored() {
    let service = common::loaded_service().await;

    // Unknown job title contributes nothing: 145000.125 - 20000 = 125000.125
    let record = EmployeeRecord::new(40.0, 10.0, "Male", "PhD", "Astronaut");
    assert_eq!(service.predict(&record).unwrap(), (125000.125 + 120000.0) / 2.0);
}

#[tokio::test]
async fn test_category_options_for_prompts() {
    let service = common::loaded_service().await;
    assert_eq!(
        service.category_options(GENDER).unwrap(),
        ["Female".to_string(), "Male".to_string()]
    );
    assert_eq!(service.category_options(EDUCATION_LEVEL).unwrap().len(), 3);
    assert_eq!(service.category_options(JOB_TITLE).unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_artifact_leaves_service_unloaded() {
    let dir = common::artifact_dir();
    std::fs::remove_file(dir.path().join(ArtifactNames::default().preprocessor)).unwrap();

    let service = PredictionService::load(&LocalStorage::new(dir.path()), &ArtifactNames::default()).await;
    assert!(!service.is_loaded());
    assert_eq!(service.model_status(), "not loaded");

    let record = EmployeeRecord::new(40.0, 10.0, "Male", "PhD", "Manager");
    assert_eq!(service.predict(&record).unwrap_err().to_string(), "Model not loaded");
}

#[tokio::test]
async fn test_empty_directory_leaves_service_unloaded() {
    let dir = TempDir::new().unwrap();
    let service = PredictionService::load(&LocalStorage::new(dir.path()), &ArtifactNames::default()).await;
    assert!(!service.is_loaded());
}

#[tokio::test]
async fn test_corrupt_artifact_leaves_service_unloaded() {
    let dir = common::artifact_dir();
    std::fs::write(dir.path().join(ArtifactNames::default().model), b"\x80\x04pickle").unwrap();

    let service = PredictionService::load(&LocalStorage::new(dir.path()), &ArtifactNames::default()).await;
    assert!(!service.is_loaded());
}

#[tokio::test]
async fn test_inconsistent_artifacts_leave_service_unloaded() {
    let dir = common::artifact_dir();
    let mut model = common::model_json();
    model["estimators"][0]["model"]["coef"] = json!([1.0, 2.0, 3.0]);
    common::write_json(dir.path(), &ArtifactNames::default().model, &model);

    let service = PredictionService::load(&LocalStorage::new(dir.path()), &ArtifactNames::default()).await;
    assert!(!service.is_loaded());

    let dir = common::artifact_dir();
    let mut features = common::features_json();
    features["categorical_features"] = json!(["Gender", "Department"]);
    common::write_json(dir.path(), &ArtifactNames::default().features, &features);

    let service = PredictionService::load(&LocalStorage::new(dir.path()), &ArtifactNames::default()).await;
    assert!(!service.is_loaded());
}

#[tokio::test]
async fn test_custom_artifact_names() {
    let dir = TempDir::new().unwrap();
    let names = ArtifactNames {
        model: "model.json".to_string(),
        preprocessor: "preprocessor.json".to_string(),
        features: "features.json".to_string(),
    };
    common::write_json(dir.path(), &names.model, &common::model_json());
    common::write_json(dir.path(), &names.preprocessor, &common::preprocessor_json());
    common::write_json(dir.path(), &names.features, &common::features_json());

    let service = PredictionService::load(&LocalStorage::new(dir.path()), &names).await;
    assert!(service.is_loaded());
}
