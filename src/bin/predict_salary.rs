use clap::Parser;
use salary_predictor::app::console::{predict_csv, Console};
use salary_predictor::config::cli::ConsoleArgs;
use salary_predictor::utils::{logger, validation::Validate};
use salary_predictor::{AppConfig, LocalStorage, PredictionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ConsoleArgs::parse();

    let config = match AppConfig::load(&args.common) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(&config.log_format, config.log_level.as_deref(), config.verbose);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(&config.artifacts_dir);
    let service = PredictionService::load(&storage, &config.artifact_names).await;

    if !service.is_loaded() {
        println!("Please run 'python salary_prediction_model.py' first to train and save the model.");
        std::process::exit(1);
    }

    if let Some(path) = &args.batch {
        tracing::info!("📁 Predicting rows from: {}", path);
        let file = std::fs::File::open(path)?;
        let stdout = std::io::stdout();
        let summary = predict_csv(&service, file, stdout.lock())?;
        tracing::info!(
            "✅ Batch finished: {} predicted, {} failed",
            summary.predicted,
            summary.failed
        );
        if summary.failed > 0 {
            std::process::exit(2);
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(&service, stdin.lock(), stdout.lock());
    console.run_menu()?;

    Ok(())
}
