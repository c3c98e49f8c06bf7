use clap::{Args, Parser};

/// Flags shared by every binary that loads the model.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the exported model artifacts
    #[arg(long)]
    pub artifacts_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "salary-predictor")]
#[command(about = "Salary prediction web service")]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit JSON log lines
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "predict_salary")]
#[command(about = "Interactive and batch salary prediction")]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Predict every row of a CSV file and write the results to stdout
    #[arg(long)]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "salary_data")]
#[command(about = "Summarize the salary training dataset")]
pub struct DataArgs {
    /// Path to the dataset CSV
    #[arg(long, default_value = "Salary Data.csv")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
