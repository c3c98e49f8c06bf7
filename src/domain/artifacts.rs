use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fitted column transformer exported next to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorSpec {
    pub transformers: Vec<ColumnTransformerSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransformerSpec {
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl ColumnTransformerSpec {
    pub fn columns(&self) -> &[String] {
        match self {
            Self::StandardScaler { columns, .. }
            | Self::OneHot { columns, .. }
            | Self::Passthrough { columns } => columns,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

/// Regressor exported by the training script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear {
        coef: Vec<f64>,
        intercept: f64,
    },
    DecisionTree(TreeSpec),
    RandomForest {
        trees: Vec<TreeSpec>,
    },
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<TreeSpec>,
    },
    Voting {
        estimators: Vec<NamedEstimator>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEstimator {
    pub name: String,
    pub model: ModelSpec,
}

/// Regression tree in parallel-array form; a node is a leaf when its
/// left child is `-1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

/// Metadata describing the columns the model was trained on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub model_name: String,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// File names of the three artifacts, relative to the artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub model: String,
    pub preprocessor: String,
    pub features: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            model: "best_salary_model_voting_regressor.json".to_string(),
            preprocessor: "best_salary_model_voting_regressor_preprocessor.json".to_string(),
            features: "best_salary_model_voting_regressor_features.json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_voting_model() {
        let json = r#"{
            "kind": "voting",
            "estimators": [
                {"name": "lr", "model": {"kind": "linear", "coef": [1.0, 2.0], "intercept": 3.0}},
                {"name": "dt", "model": {
                    "kind": "decision_tree",
                    "n_features": 2,
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [0, -2, -2],
                    "threshold": [0.5, -2.0, -2.0],
                    "value": [0.0, 10.0, 20.0]
                }}
            ]
        }"#;
        let spec: ModelSpec = serde_json::from_str(json).unwrap();
        match spec {
            ModelSpec::Voting { estimators, weights } => {
                assert_eq!(estimators.len(), 2);
                assert_eq!(estimators[1].name, "dt");
                assert!(weights.is_none());
            }
            other => panic!("unexpected model: {:?}", other),
        }
    }

    #[test]
    fn test_one_hot_defaults_to_error_on_unknown() {
        let json = r#"{"transformers": [
            {"kind": "one_hot", "columns": ["Gender"], "categories": [["Female", "Male"]]}
        ]}"#;
        let spec: PreprocessorSpec = serde_json::from_str(json).unwrap();
        match &spec.transformers[0] {
            ColumnTransformerSpec::OneHot { handle_unknown, .. } => {
                assert_eq!(*handle_unknown, HandleUnknown::Error)
            }
            other => panic!("unexpected transformer: {:?}", other),
        }
        assert_eq!(spec.transformers[0].columns(), ["Gender".to_string()]);
    }

    #[test]
    fn test_default_artifact_names() {
        let names = ArtifactNames::default();
        assert_eq!(names.model, "best_salary_model_voting_regressor.json");
        assert!(names.preprocessor.ends_with("_preprocessor.json"));
        assert!(names.features.ends_with("_features.json"));
    }
}
