use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const AGE: &str = "Age";
pub const YEARS_OF_EXPERIENCE: &str = "Years of Experience";
pub const GENDER: &str = "Gender";
pub const EDUCATION_LEVEL: &str = "Education Level";
pub const JOB_TITLE: &str = "Job Title";

/// Request field names, in the order they are checked.
pub const REQUEST_FIELDS: [&str; 5] = [
    "age",
    "years_experience",
    "gender",
    "education_level",
    "job_title",
];

/// One row of employee attributes, built per request and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Years of Experience")]
    pub years_experience: f64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Education Level")]
    pub education_level: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
}

/// A single cell value handed to the preprocessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl EmployeeRecord {
    pub fn new(
        age: f64,
        years_experience: f64,
        gender: impl Into<String>,
        education_level: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            age,
            years_experience,
            gender: gender.into(),
            education_level: education_level.into(),
            job_title: job_title.into(),
        }
    }

    /// Builds a record from a JSON request body.
    ///
    /// Missing, null or blank fields are reported together as
    /// [`PredictorError::MissingFields`]. Zero is a valid numeric value.
    pub fn from_json(body: &Value) -> Result<Self> {
        let obj = body.as_object().ok_or_else(|| {
            PredictorError::invalid_input("body", "request body must be a JSON object")
        })?;

        let missing: Vec<String> = REQUEST_FIELDS
            .iter()
            .filter(|name| is_blank(obj.get(**name)))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PredictorError::MissingFields { fields: missing });
        }

        let record = Self {
            age: json_number("age", &obj["age"])?,
            years_experience: json_number("years_experience", &obj["years_experience"])?,
            gender: json_text("gender", &obj["gender"])?,
            education_level: json_text("education_level", &obj["education_level"])?,
            job_title: json_text("job_title", &obj["job_title"])?,
        };
        record.validate()?;
        Ok(record)
    }

    /// 數值範圍檢查
    pub fn validate(&self) -> Result<()> {
        if !self.age.is_finite() || self.age <= 0.0 {
            return Err(PredictorError::invalid_input(
                "age",
                format!("{} is not a positive number", self.age),
            ));
        }
        if !self.years_experience.is_finite() || self.years_experience < 0.0 {
            return Err(PredictorError::invalid_input(
                "years_experience",
                format!("{} is not a non-negative number", self.years_experience),
            ));
        }
        Ok(())
    }

    /// Looks up a column by its training-data name.
    pub fn column(&self, name: &str) -> Option<FeatureValue<'_>> {
        match name {
            AGE => Some(FeatureValue::Number(self.age)),
            YEARS_OF_EXPERIENCE => Some(FeatureValue::Number(self.years_experience)),
            GENDER => Some(FeatureValue::Text(&self.gender)),
            EDUCATION_LEVEL => Some(FeatureValue::Text(&self.education_level)),
            JOB_TITLE => Some(FeatureValue::Text(&self.job_title)),
            _ => None,
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

pub fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PredictorError::invalid_input(field, format!("'{}' is not a number", raw)))
}

fn json_number(field: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PredictorError::invalid_input(field, format!("{} is out of range", n))),
        Value::String(s) => parse_number(field, s),
        other => Err(PredictorError::invalid_input(
            field,
            format!("expected a number, got {}", other),
        )),
    }
}

fn json_text(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(PredictorError::invalid_input(
            field,
            format!("expected a string, got {}", other),
        )),
    }
}

/// Outcome of a successful prediction, as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryPrediction {
    pub predicted_salary: f64,
    pub formatted_salary: String,
}

impl SalaryPrediction {
    pub fn from_value(value: f64) -> Self {
        Self {
            predicted_salary: round_cents(value),
            formatted_salary: format_currency(value),
        }
    }
}

/// Rounds to two decimals through the same decimal rendering the currency
/// string uses, so the two never disagree.
pub fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `$` followed by the amount with thousands separators and two decimals.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}.{}", sign, grouped, frac_part)
}
