use crate::core::service::PredictionService;
use crate::domain::model::{
    format_currency, parse_number, EmployeeRecord, AGE, EDUCATION_LEVEL, GENDER, JOB_TITLE,
    YEARS_OF_EXPERIENCE,
};
use crate::utils::error::{PredictorError, Result};
use std::io::{BufRead, Read, Write};

const BANNER_WIDTH: usize = 60;

/// Whether the input stream is still open after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Ended,
}

pub fn sample_employees() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new(28.0, 3.0, "Female", "Master's", "Data Scientist"),
        EmployeeRecord::new(35.0, 8.0, "Male", "Bachelor's", "Product Manager"),
        EmployeeRecord::new(42.0, 15.0, "Female", "PhD", "Senior Manager"),
        EmployeeRecord::new(25.0, 1.0, "Male", "Bachelor's", "Junior Developer"),
        EmployeeRecord::new(50.0, 20.0, "Male", "Master's", "Director"),
    ]
}

/// Numbered-menu front end over any input/output pair.
pub struct Console<'a, R, W> {
    service: &'a PredictionService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(service: &'a PredictionService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // None 表示輸入已結束
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn banner(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(BANNER_WIDTH))?;
        writeln!(self.output, "{}", title)?;
        writeln!(self.output, "{}", "=".repeat(BANNER_WIDTH))?;
        Ok(())
    }

    fn options_hint(&self, column: &str, fallback: &str) -> String {
        match self.service.category_options(column) {
            Some(options) if !options.is_empty() => options.join(", "),
            _ => fallback.to_string(),
        }
    }

    pub fn run_menu(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the Salary Prediction Tool!")?;
        writeln!(self.output, "\nOptions:")?;
        writeln!(self.output, "1. Interactive Prediction")?;
        writeln!(self.output, "2. Batch Prediction Example")?;
        writeln!(self.output, "3. Exit")?;

        loop {
            let Some(choice) = self.prompt("\nSelect an option (1-3): ")? else {
                writeln!(self.output, "\n\nGoodbye!")?;
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if self.interactive_prediction()? == Flow::Ended {
                        return Ok(());
                    }
                }
                "2" => self.batch_prediction_example()?,
                "3" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Please select 1, 2, or 3.")?,
            }
        }
    }

    fn read_number(&mut self, label: &str, field: &str) -> Result<Option<std::result::Result<f64, PredictorError>>> {
        Ok(self
            .prompt(&format!("{}: ", label))?
            .map(|raw| parse_number(field, &raw)))
    }

    pub fn interactive_prediction(&mut self) -> Result<Flow> {
        self.banner("SALARY PREDICTION TOOL")?;

        loop {
            writeln!(self.output, "\nEnter employee details:")?;

            let age = match self.read_number("Age", "age")? {
                None => return self.goodbye(),
                Some(Ok(age)) => age,
                Some(Err(_)) => {
                    self.numeric_error()?;
                    continue;
                }
            };
            let years_exp = match self.read_number("Years of Experience", "years_experience")? {
                None => return self.goodbye(),
                Some(Ok(years_exp)) => years_exp,
                Some(Err(_)) => {
                    self.numeric_error()?;
                    continue;
                }
            };

            let hint = self.options_hint(GENDER, "Male, Female");
            writeln!(self.output, "\nGender options: {}", hint)?;
            let Some(gender) = self.prompt("Gender: ")? else {
                return self.goodbye();
            };

            let hint = self.options_hint(EDUCATION_LEVEL, "Bachelor's, Master's, PhD");
            writeln!(self.output, "\nEducation Level options: {}", hint)?;
            let Some(education) = self.prompt("Education Level: ")? else {
                return self.goodbye();
            };

            writeln!(
                self.output,
                "\nJob Title (e.g., Software Engineer, Data Analyst, Manager): "
            )?;
            let Some(job_title) = self.prompt("Job Title: ")? else {
                return self.goodbye();
            };

            let record = EmployeeRecord::new(age, years_exp, gender, education, job_title);
            match record.validate().and_then(|_| self.service.predict(&record)) {
                Ok(salary) => {
                    writeln!(self.output, "\n🎯 PREDICTED SALARY: {}", format_currency(salary))?;
                    writeln!(self.output, "\nEmployee Profile:")?;
                    writeln!(self.output, "  Age: {}", record.age)?;
                    writeln!(self.output, "  Experience: {} years", record.years_experience)?;
                    writeln!(self.output, "  Gender: {}", record.gender)?;
                    writeln!(self.output, "  Education: {}", record.education_level)?;
                    writeln!(self.output, "  Job Title: {}", record.job_title)?;
                }
                Err(e) => writeln!(self.output, "❌ Error: {}", e)?,
            }

            let Some(another) = self.prompt("\nMake another prediction? (y/n): ")? else {
                return self.goodbye();
            };
            if another.to_lowercase() != "y" {
                return Ok(Flow::Continue);
            }
        }
    }

    fn numeric_error(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "❌ Please enter valid numeric values for age and experience."
        )?;
        Ok(())
    }

    fn goodbye(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n\nGoodbye!")?;
        Ok(Flow::Ended)
    }

    pub fn batch_prediction_example(&mut self) -> Result<()> {
        self.banner("BATCH PREDICTION EXAMPLE")?;
        writeln!(self.output, "Predicting salaries for sample employees:\n")?;

        for (i, employee) in sample_employees().iter().enumerate() {
            writeln!(self.output, "Employee {}:", i + 1)?;
            writeln!(
                self.output,
                "  Profile: {} years old, {} years exp, {}",
                employee.age, employee.years_experience, employee.gender
            )?;
            writeln!(
                self.output,
                "  Education: {}, Job: {}",
                employee.education_level, employee.job_title
            )?;
            match self.service.predict(employee) {
                Ok(salary) => writeln!(self.output, "  💰 Predicted Salary: {}\n", format_currency(salary))?,
                Err(e) => writeln!(self.output, "  ❌ Error: {}\n", e)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub predicted: usize,
    pub failed: usize,
}

const INPUT_COLUMNS: [&str; 5] = [AGE, YEARS_OF_EXPERIENCE, GENDER, EDUCATION_LEVEL, JOB_TITLE];

fn predict_row(
    service: &PredictionService,
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
) -> Result<f64> {
    if row.len() != headers.len() {
        return Err(PredictorError::invalid_input(
            "csv",
            format!("row has {} fields, but the header has {}", row.len(), headers.len()),
        ));
    }
    let record: EmployeeRecord = row.deserialize(Some(headers))?;
    record.validate()?;
    service.predict(&record)
}

/// Predicts every row of an employee CSV and writes the rows back out with
/// `Predicted Salary` and `Error` columns. A failing row does not stop the
/// batch.
pub fn predict_csv<R: Read, W: Write>(
    service: &PredictionService,
    reader: R,
    writer: W,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut positions = Vec::with_capacity(INPUT_COLUMNS.len());
    for column in INPUT_COLUMNS {
        let idx = headers.iter().position(|h| h == column).ok_or_else(|| {
            PredictorError::invalid_input("csv", format!("missing column '{}'", column))
        })?;
        positions.push(idx);
    }

    let mut writer = csv::Writer::from_writer(writer);
    let mut out_headers: Vec<&str> = INPUT_COLUMNS.to_vec();
    out_headers.extend(["Predicted Salary", "Error"]);
    writer.write_record(&out_headers)?;

    let mut summary = BatchSummary::default();
    for (idx, row) in reader.records().enumerate() {
        let (mut fields, outcome) = match row {
            Ok(row) => {
                let fields: Vec<String> = positions
                    .iter()
                    .map(|&i| row.get(i).unwrap_or_default().to_string())
                    .collect();
                (fields, predict_row(service, &headers, &row))
            }
            // 讀檔失敗無法繼續，其餘錯誤只影響這一列
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => (vec![String::new(); INPUT_COLUMNS.len()], Err(e.into())),
        };

        match outcome {
            Ok(salary) => {
                summary.predicted += 1;
                fields.push(format!("{:.2}", salary));
                fields.push(String::new());
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!("Row {} failed: {}", idx + 1, e);
                fields.push(String::new());
                fields.push(e.to_string());
            }
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preprocessor::ColumnTransformer;
    use crate::core::regressor::Model;
    use crate::core::service::LoadedArtifacts;
    use crate::domain::artifacts::{
        ColumnTransformerSpec, FeatureInfo, HandleUnknown, ModelSpec, PreprocessorSpec,
    };
    use std::io::Cursor;

    // salary = 1000 * age + 2000 * experience + 5000 if PhD
    fn service() -> PredictionService {
        let preprocessor = ColumnTransformer::from_spec(PreprocessorSpec {
            transformers: vec![
                ColumnTransformerSpec::Passthrough {
                    columns: vec![AGE.to_string(), YEARS_OF_EXPERIENCE.to_string()],
                },
                ColumnTransformerSpec::OneHot {
                    columns: vec![GENDER.to_string(), EDUCATION_LEVEL.to_string()],
                    categories: vec![
                        vec!["Female".to_string(), "Male".to_string()],
                        vec!["Bachelor's".to_string(), "Master's".to_string(), "PhD".to_string()],
                    ],
                    handle_unknown: HandleUnknown::Error,
                },
            ],
        })
        .unwrap();
        let model = Model::from_spec(ModelSpec::Linear {
            coef: vec![1000.0, 2000.0, 0.0, 0.0, 0.0, 0.0, 5000.0],
            intercept: 0.0,
        })
        .unwrap();
        let info = FeatureInfo {
            model_name: "Linear".to_string(),
            numeric_features: vec![AGE.to_string(), YEARS_OF_EXPERIENCE.to_string()],
            categorical_features: vec![GENDER.to_string(), EDUCATION_LEVEL.to_string()],
            ..FeatureInfo::default()
        };
        PredictionService::with_artifacts(LoadedArtifacts::new(model, preprocessor, info).unwrap())
    }

    fn run(service: &PredictionService, input: &str) -> String {
        let mut console = Console::new(service, Cursor::new(input.to_string()), Vec::new());
        console.run_menu().unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_interactive_prediction_flow() {
        let service = service();
        let output = run(&service, "1\n30\n5\nMale\nPhD\nEngineer\nn\n3\n");

        assert!(output.contains("🎯 PREDICTED SALARY: $45,000.00"));
        assert!(output.contains("  Experience: 5 years"));
        assert!(output.contains("Gender options: Female, Male"));
        assert!(output.contains("Education Level options: Bachelor's, Master's, PhD"));
        assert!(output.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_invalid_number_restarts_entry() {
        let service = service();
        let output = run(&service, "1\nabc\n30\n0\nFemale\nBachelor's\nAnalyst\nn\n3\n");

        assert!(output.contains("❌ Please enter valid numeric values for age and experience."));
        assert!(output.contains("🎯 PREDICTED SALARY: $30,000.00"));
    }

    #[test]
    fn test_unknown_category_reported() {
        let service = service();
        let output = run(&service, "1\n30\n5\nMale\nDiploma\nEngineer\nn\n3\n");
        assert!(output.contains("❌ Error: Found unknown categories ['Diploma'] in column 1 during transform"));
    }

    #[test]
    fn test_invalid_choice_and_eof() {
        let service = service();
        let output = run(&service, "7\n");
        assert!(output.contains("Invalid choice. Please select 1, 2, or 3."));
        assert!(output.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn test_batch_example() {
        let service = service();
        let output = run(&service, "2\n3\n");
        assert!(output.contains("BATCH PREDICTION EXAMPLE"));
        assert!(output.contains("Employee 5:"));
        // 28 * 1000 + 3 * 2000
        assert!(output.contains("💰 Predicted Salary: $34,000.00"));
        // 42 * 1000 + 15 * 2000 + 5000
        assert!(output.contains("💰 Predicted Salary: $77,000.00"));
    }

    #[test]
    fn test_batch_example_without_model() {
        let service = PredictionService::not_loaded();
        let output = run(&service, "2\n3\n");
        assert!(output.contains("❌ Error: Model not loaded"));
    }

    #[test]
    fn test_predict_csv() {
        let service = service();
        let input = "Age,Years of Experience,Gender,Education Level,Job Title\n\
                     30,5,Male,PhD,Engineer\n\
                     abc,5,Male,PhD,Engineer\n\
                     40,10,Female,Diploma,Manager\n";
        let mut out = Vec::new();
        let summary = predict_csv(&service, input.as_bytes(), &mut out).unwrap();

        assert_eq!(summary, BatchSummary { predicted: 1, failed: 2 });
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Age,Years of Experience,Gender,Education Level,Job Title,Predicted Salary,Error"
        );
        assert_eq!(lines[1], "30,5,Male,PhD,Engineer,45000.00,");
        assert!(lines[2].starts_with("abc,5,Male,PhD,Engineer,,"));
        assert!(lines[3].contains("Found unknown categories ['Diploma']"));
    }

    #[test]
    fn test_predict_csv_ragged_row_does_not_stop_batch() {
        let service = service();
        let input = "Age,Years of Experience,Gender,Education Level,Job Title\n\
                     30,5,Male,PhD,Engineer\n\
                     41,7,Female\n\
                     28,3,Female,Bachelor's,Analyst\n";
        let mut out = Vec::new();
        let summary = predict_csv(&service, input.as_bytes(), &mut out).unwrap();

        assert_eq!(summary, BatchSummary { predicted: 2, failed: 1 });

        let mut rows = csv::Reader::from_reader(out.as_slice());
        let records: Vec<csv::StringRecord> = rows.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][5], "45000.00");
        assert_eq!(&records[1][0], "41");
        assert_eq!(&records[1][3], "");
        assert_eq!(&records[1][5], "");
        assert!(records[1][6].contains("row has 3 fields, but the header has 5"));
        assert_eq!(&records[2][5], "34000.00");
        assert_eq!(&records[2][6], "");
    }

    #[test]
    fn test_predict_csv_missing_column() {
        let service = service();
        let input = "Age,Gender\n30,Male\n";
        assert!(predict_csv(&service, input.as_bytes(), Vec::new()).is_err());
    }
}
