use crate::domain::artifacts::{ColumnTransformerSpec, HandleUnknown, PreprocessorSpec};
use crate::domain::model::{EmployeeRecord, FeatureValue};
use crate::domain::ports::FeatureTransformer;
use crate::utils::error::{PredictorError, Result};

const ARTIFACT: &str = "preprocessor";

/// Column transformer: each step reads named columns of the record and
/// appends its outputs, in step order.
#[derive(Debug, Clone)]
pub struct ColumnTransformer {
    steps: Vec<ColumnTransformerSpec>,
    n_features_out: usize,
}

impl ColumnTransformer {
    pub fn from_spec(spec: PreprocessorSpec) -> Result<Self> {
        if spec.transformers.is_empty() {
            return Err(PredictorError::invalid_artifact(ARTIFACT, "no transformers defined"));
        }

        let mut n_features_out = 0;
        for (i, step) in spec.transformers.iter().enumerate() {
            if step.columns().is_empty() {
                return Err(PredictorError::invalid_artifact(
                    ARTIFACT,
                    format!("transformer {} has no columns", i),
                ));
            }
            n_features_out += match step {
                ColumnTransformerSpec::StandardScaler { columns, mean, scale } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(PredictorError::invalid_artifact(
                            ARTIFACT,
                            format!(
                                "scaler {} has {} columns but {} means and {} scales",
                                i,
                                columns.len(),
                                mean.len(),
                                scale.len()
                            ),
                        ));
                    }
                    columns.len()
                }
                ColumnTransformerSpec::OneHot { columns, categories, .. } => {
                    if categories.len() != columns.len() {
                        return Err(PredictorError::invalid_artifact(
                            ARTIFACT,
                            format!(
                                "encoder {} has {} columns but {} category lists",
                                i,
                                columns.len(),
                                categories.len()
                            ),
                        ));
                    }
                    categories.iter().map(Vec::len).sum()
                }
                ColumnTransformerSpec::Passthrough { columns } => columns.len(),
            };
        }

        Ok(Self {
            steps: spec.transformers,
            n_features_out,
        })
    }

    /// Every input column consumed by some step.
    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|step| step.columns().iter().map(String::as_str))
    }

    /// Known categories of a one-hot encoded column.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.steps.iter().find_map(|step| match step {
            ColumnTransformerSpec::OneHot { columns, categories, .. } => columns
                .iter()
                .position(|c| c == column)
                .map(|idx| categories[idx].as_slice()),
            _ => None,
        })
    }

    fn check_columns(&self, record: &EmployeeRecord) -> Result<()> {
        let missing: Vec<&str> = self
            .input_columns()
            .filter(|column| record.column(column).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PredictorError::TransformError {
                message: format!("columns are missing: {}", missing.join(", ")),
            })
        }
    }
}

fn numeric(record: &EmployeeRecord, column: &str) -> Result<f64> {
    match record.column(column) {
        Some(FeatureValue::Number(v)) => Ok(v),
        Some(FeatureValue::Text(s)) => Err(PredictorError::TransformError {
            message: format!("could not convert string to float: '{}' (column '{}')", s, column),
        }),
        None => Err(PredictorError::TransformError {
            message: format!("columns are missing: {}", column),
        }),
    }
}

fn categorical(record: &EmployeeRecord, column: &str) -> Result<String> {
    match record.column(column) {
        Some(FeatureValue::Text(s)) => Ok(s.to_string()),
        Some(FeatureValue::Number(v)) => Ok(v.to_string()),
        None => Err(PredictorError::TransformError {
            message: format!("columns are missing: {}", column),
        }),
    }
}

impl FeatureTransformer for ColumnTransformer {
    fn transform(&self, record: &EmployeeRecord) -> Result<Vec<f64>> {
        self.check_columns(record)?;

        let mut out = Vec::with_capacity(self.n_features_out);
        for step in &self.steps {
            match step {
                ColumnTransformerSpec::StandardScaler { columns, mean, scale } => {
                    for (idx, column) in columns.iter().enumerate() {
                        let x = numeric(record, column)?;
                        // 標準差為 0 時不縮放
                        let s = if scale[idx] == 0.0 { 1.0 } else { scale[idx] };
                        out.push((x - mean[idx]) / s);
                    }
                }
                ColumnTransformerSpec::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                } => {
                    for (idx, column) in columns.iter().enumerate() {
                        let value = categorical(record, column)?;
                        let known = &categories[idx];
                        let hit = known.iter().position(|c| *c == value);
                        if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                            return Err(PredictorError::TransformError {
                                message: format!(
                                    "Found unknown categories ['{}'] in column {} during transform",
                                    value, idx
                                ),
                            });
                        }
                        out.extend((0..known.len()).map(|k| if Some(k) == hit { 1.0 } else { 0.0 }));
                    }
                }
                ColumnTransformerSpec::Passthrough { columns } => {
                    for column in columns {
                        out.push(numeric(record, column)?);
                    }
                }
            }
        }

        Ok(out)
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}
