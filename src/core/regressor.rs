//! Evaluation of exported regressors.
//!
//! Specs are validated once at load time so that `predict` only has to
//! check the input width: tree children always point forward, so traversal
//! terminates, and every ensemble member agrees on its input width.

use crate::domain::artifacts::{ModelSpec, TreeSpec};
use crate::domain::ports::Regressor;
use crate::utils::error::{PredictorError, Result};

const ARTIFACT: &str = "model";

#[derive(Debug, Clone)]
pub struct RegressionTree {
    n_features: usize,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl RegressionTree {
    pub fn from_spec(spec: TreeSpec) -> Result<Self> {
        let n = spec.value.len();
        if n == 0 {
            return Err(PredictorError::invalid_artifact(ARTIFACT, "tree has no nodes"));
        }
        if spec.children_left.len() != n
            || spec.children_right.len() != n
            || spec.feature.len() != n
            || spec.threshold.len() != n
        {
            return Err(PredictorError::invalid_artifact(
                ARTIFACT,
                "tree node arrays have different lengths",
            ));
        }

        for node in 0..n {
            let (left, right) = (spec.children_left[node], spec.children_right[node]);
            if left == -1 {
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(PredictorError::invalid_artifact(
                        ARTIFACT,
                        format!("node {} has invalid child {}", node, child),
                    ));
                }
            }
            let feature = spec.feature[node];
            if feature < 0 || feature as usize >= spec.n_features {
                return Err(PredictorError::invalid_artifact(
                    ARTIFACT,
                    format!(
                        "node {} splits on feature {} but the tree has {} features",
                        node, feature, spec.n_features
                    ),
                ));
            }
        }

        Ok(Self {
            n_features: spec.n_features,
            children_left: spec.children_left,
            children_right: spec.children_right,
            feature: spec.feature,
            threshold: spec.threshold,
            value: spec.value,
        })
    }

    fn leaf_value(&self, x: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

#[derive(Debug, Clone)]
pub enum Model {
    Linear {
        coef: Vec<f64>,
        intercept: f64,
    },
    Tree(RegressionTree),
    Forest(Vec<RegressionTree>),
    Boosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
    Voting {
        estimators: Vec<(String, Model)>,
        weights: Vec<f64>,
    },
}

fn build_trees(specs: Vec<TreeSpec>, kind: &str) -> Result<Vec<RegressionTree>> {
    if specs.is_empty() {
        return Err(PredictorError::invalid_artifact(
            ARTIFACT,
            format!("{} has no trees", kind),
        ));
    }
    let trees = specs
        .into_iter()
        .map(RegressionTree::from_spec)
        .collect::<Result<Vec<_>>>()?;
    let width = trees[0].n_features;
    if trees.iter().any(|t| t.n_features != width) {
        return Err(PredictorError::invalid_artifact(
            ARTIFACT,
            format!("{} trees disagree on input width", kind),
        ));
    }
    Ok(trees)
}

impl Model {
    pub fn from_spec(spec: ModelSpec) -> Result<Self> {
        match spec {
            ModelSpec::Linear { coef, intercept } => {
                if coef.is_empty() {
                    return Err(PredictorError::invalid_artifact(ARTIFACT, "linear model has no coefficients"));
                }
                Ok(Self::Linear { coef, intercept })
            }
            ModelSpec::DecisionTree(tree) => Ok(Self::Tree(RegressionTree::from_spec(tree)?)),
            ModelSpec::RandomForest { trees } => Ok(Self::Forest(build_trees(trees, "random forest")?)),
            ModelSpec::GradientBoosting {
                init,
                learning_rate,
                trees,
            } => Ok(Self::Boosting {
                init,
                learning_rate,
                trees: build_trees(trees, "gradient boosting")?,
            }),
            ModelSpec::Voting { estimators, weights } => {
                if estimators.is_empty() {
                    return Err(PredictorError::invalid_artifact(ARTIFACT, "voting model has no estimators"));
                }
                let weights = match weights {
                    Some(w) if w.len() != estimators.len() => {
                        return Err(PredictorError::invalid_artifact(
                            ARTIFACT,
                            format!(
                                "{} weights given for {} estimators",
                                w.len(),
                                estimators.len()
                            ),
                        ));
                    }
                    Some(w) if w.iter().any(|v| *v < 0.0) || w.iter().sum::<f64>() <= 0.0 => {
                        return Err(PredictorError::invalid_artifact(
                            ARTIFACT,
                            "voting weights must be non-negative with a positive sum",
                        ));
                    }
                    Some(w) => w,
                    None => vec![1.0; estimators.len()],
                };

                let estimators = estimators
                    .into_iter()
                    .map(|e| Model::from_spec(e.model).map(|model| (e.name, model)))
                    .collect::<Result<Vec<_>>>()?;
                let width = estimators[0].1.n_features_in();
                if let Some((name, model)) = estimators.iter().find(|(_, m)| m.n_features_in() != width) {
                    return Err(PredictorError::invalid_artifact(
                        ARTIFACT,
                        format!(
                            "estimator '{}' expects {} features, '{}' expects {}",
                            name,
                            model.n_features_in(),
                            estimators[0].0,
                            width
                        ),
                    ));
                }
                Ok(Self::Voting { estimators, weights })
            }
        }
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            Self::Linear { coef, intercept } => {
                coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>() + intercept
            }
            Self::Tree(tree) => tree.leaf_value(x),
            Self::Forest(trees) => {
                trees.iter().map(|t| t.leaf_value(x)).sum::<f64>() / trees.len() as f64
            }
            Self::Boosting {
                init,
                learning_rate,
                trees,
            } => init + learning_rate * trees.iter().map(|t| t.leaf_value(x)).sum::<f64>(),
            Self::Voting { estimators, weights } => {
                let total: f64 = weights.iter().sum();
                estimators
                    .iter()
                    .zip(weights)
                    .map(|((_, m), w)| m.evaluate(x) * w)
                    .sum::<f64>()
                    / total
            }
        }
    }

    pub fn estimator_names(&self) -> Vec<&str> {
        match self {
            Self::Voting { estimators, .. } => estimators.iter().map(|(n, _)| n.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Regressor for Model {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        let expected = self.n_features_in();
        if features.len() != expected {
            return Err(PredictorError::PredictionError {
                message: format!(
                    "X has {} features, but the model is expecting {} features as input",
                    features.len(),
                    expected
                ),
            });
        }

        let value = self.evaluate(features);
        if !value.is_finite() {
            return Err(PredictorError::PredictionError {
                message: format!("model produced a non-finite prediction: {}", value),
            });
        }
        Ok(value)
    }

    fn n_features_in(&self) -> usize {
        match self {
            Self::Linear { coef, .. } => coef.len(),
            Self::Tree(tree) => tree.n_features,
            Self::Forest(trees) | Self::Boosting { trees, .. } => trees[0].n_features,
            Self::Voting { estimators, .. } => estimators[0].1.n_features_in(),
        }
    }
}
