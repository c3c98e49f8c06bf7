use clap::Parser;
use salary_predictor::app::dataset::{write_report, SalaryDataset};
use salary_predictor::config::cli::DataArgs;
use salary_predictor::utils::logger;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let args = DataArgs::parse();
    logger::init_cli_logger(args.verbose);

    let path = Path::new(&args.path);
    tracing::debug!("Loading dataset from: {}", path.display());

    let dataset = match SalaryDataset::from_path(path) {
        Ok(dataset) => dataset,
        Err(salary_predictor::PredictorError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| args.path.clone());
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
                _ => std::env::current_dir()?.display().to_string(),
            };
            eprintln!("Error: File '{}' not found in {}", name, dir);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading dataset: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    write_report(&dataset, &mut stdout.lock())?;
    Ok(())
}
