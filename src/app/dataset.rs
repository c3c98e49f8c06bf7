//! Exploratory summary of the salary training dataset.
//!
//! Empty cells are treated as missing and left out of every statistic.
//! A column is numeric when every present value parses as a float.

use crate::domain::model::{EDUCATION_LEVEL, GENDER, JOB_TITLE};
use crate::utils::error::{PredictorError, Result};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

pub const SALARY: &str = "Salary";
pub const CATEGORICAL_COLUMNS: [&str; 3] = [GENDER, EDUCATION_LEVEL, JOB_TITLE];
const HEAD_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct SalaryDataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl SalaryDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = (0..headers.len())
                .map(|i| record.get(i).filter(|v| !v.is_empty()).map(str::to_string))
                .collect();
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn present(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(move |row| row[idx].as_deref())
    }

    /// Present values of a column, if all of them are numeric.
    pub fn numeric_values(&self, idx: usize) -> Option<Vec<f64>> {
        self.present(idx).map(|v| v.parse::<f64>().ok()).collect()
    }

    pub fn column_info(&self) -> Vec<ColumnInfo> {
        (0..self.headers.len())
            .map(|idx| ColumnInfo {
                name: self.headers[idx].clone(),
                non_null: self.present(idx).count(),
                dtype: if self.numeric_values(idx).is_some() {
                    ColumnType::Numeric
                } else {
                    ColumnType::Text
                },
            })
            .collect()
    }

    pub fn describe(&self, idx: usize) -> Option<Describe> {
        let mut values = self.numeric_values(idx)?;
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(Describe {
            count: values.len(),
            mean: mean(&values),
            std: sample_std(&values),
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }

    /// Counts per distinct value, most frequent first; ties keep first
    /// appearance order.
    pub fn value_counts(&self, idx: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for value in self.present(idx) {
            match counts.iter_mut().find(|(v, _)| v == value) {
                Some((_, n)) => *n += 1,
                None => counts.push((value.to_string(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Statistics of `value_col` per distinct `group_col`, sorted by group.
    pub fn group_stats(&self, group_col: &str, value_col: &str) -> Result<Vec<(String, GroupStats)>> {
        let group_idx = self.require_column(group_col)?;
        let value_idx = self.require_column(value_col)?;

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            let (Some(group), Some(raw)) = (&row[group_idx], &row[value_idx]) else {
                continue;
            };
            let value = raw.parse::<f64>().map_err(|_| {
                PredictorError::invalid_input(value_col, format!("'{}' is not a number", raw))
            })?;
            groups.entry(group.clone()).or_default().push(value);
        }

        Ok(groups
            .into_iter()
            .map(|(group, mut values)| {
                values.sort_by(f64::total_cmp);
                let stats = GroupStats {
                    mean: mean(&values),
                    median: quantile(&values, 0.5),
                    std: sample_std(&values),
                    min: values[0],
                    max: values[values.len() - 1],
                };
                (group, stats)
            })
            .collect())
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            PredictorError::invalid_input("dataset", format!("column '{}' not found", name))
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ddof = 1，單筆資料時為 NaN
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

fn fmt_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn write_table<W: Write>(out: &mut W, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    writeln!(out, "{}", line(header))?;
    for row in rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}

/// Prints the same overview the original exploration script printed.
pub fn write_report<W: Write>(dataset: &SalaryDataset, out: &mut W) -> Result<()> {
    let (n_rows, n_cols) = dataset.shape();
    writeln!(out, "Dataset loaded successfully!")?;
    writeln!(out, "Dataset shape: ({}, {})", n_rows, n_cols)?;

    writeln!(out, "\nFirst few rows:")?;
    let mut header = vec![String::new()];
    header.extend(dataset.headers().iter().cloned());
    let head: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .take(HEAD_ROWS)
        .enumerate()
        .map(|(i, row)| {
            std::iter::once(i.to_string())
                .chain(row.iter().map(|v| v.clone().unwrap_or_else(|| "NaN".to_string())))
                .collect()
        })
        .collect();
    write_table(out, &header, &head)?;

    writeln!(out, "\nDataset info:")?;
    writeln!(out, "RangeIndex: {} entries", n_rows)?;
    let info: Vec<Vec<String>> = dataset
        .column_info()
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.name,
                format!("{} non-null", c.non_null),
                match c.dtype {
                    ColumnType::Numeric => "float64".to_string(),
                    ColumnType::Text => "object".to_string(),
                },
            ]
        })
        .collect();
    write_table(
        out,
        &["#", "Column", "Non-Null Count", "Dtype"].map(String::from),
        &info,
    )?;

    writeln!(out, "\nBasic statistics:")?;
    let numeric: Vec<(String, Describe)> = (0..n_cols)
        .filter_map(|idx| dataset.describe(idx).map(|d| (dataset.headers()[idx].clone(), d)))
        .collect();
    let mut header = vec![String::new()];
    header.extend(numeric.iter().map(|(name, _)| name.clone()));
    let stat_rows: Vec<Vec<String>> = [
        "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ]
    .iter()
    .map(|label| {
        std::iter::once(label.to_string())
            .chain(numeric.iter().map(|(_, d)| match *label {
                "count" => format!("{:.2}", d.count as f64),
                "mean" => fmt_stat(d.mean),
                "std" => fmt_stat(d.std),
                "min" => fmt_stat(d.min),
                "25%" => fmt_stat(d.q25),
                "50%" => fmt_stat(d.median),
                "75%" => fmt_stat(d.q75),
                _ => fmt_stat(d.max),
            }))
            .collect()
    })
    .collect();
    write_table(out, &header, &stat_rows)?;

    writeln!(out, "\n{}", "=".repeat(50))?;
    writeln!(out, "SALARY DATASET ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(50))?;

    writeln!(out, "\nUnique values in categorical columns:")?;
    for column in CATEGORICAL_COLUMNS {
        let Some(idx) = dataset.column_index(column) else {
            continue;
        };
        writeln!(out, "\n{}:", column)?;
        for (value, count) in dataset.value_counts(idx) {
            writeln!(out, "{}    {}", value, count)?;
        }
    }

    for group in [EDUCATION_LEVEL, GENDER] {
        if dataset.column_index(group).is_none() || dataset.column_index(SALARY).is_none() {
            continue;
        }
        writeln!(out, "\nSalary statistics by {}:", group)?;
        let rows: Vec<Vec<String>> = dataset
            .group_stats(group, SALARY)?
            .into_iter()
            .map(|(name, s)| {
                vec![
                    name,
                    fmt_stat(s.mean),
                    fmt_stat(s.median),
                    fmt_stat(s.std),
                    fmt_stat(s.min),
                    fmt_stat(s.max),
                ]
            })
            .collect();
        write_table(
            out,
            &[group, "mean", "median", "std", "min", "max"].map(String::from),
            &rows,
        )?;
    }

    Ok(())
}
