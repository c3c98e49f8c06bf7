use clap::Parser;
use salary_predictor::config::cli::ServeArgs;
use salary_predictor::utils::{logger, validation::Validate};
use salary_predictor::{create_router, AppConfig, LocalStorage, PredictionService, PredictorError};
use std::sync::Arc;

const BANNER_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();

    let mut config = match AppConfig::load(&args.common) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.log_json {
        config.log_format = "json".to_string();
    }

    // 初始化日誌
    logger::init_logger(&config.log_format, config.log_level.as_deref(), config.verbose);

    tracing::info!("Starting salary-predictor web service");
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let storage = LocalStorage::new(&config.artifacts_dir);
    let service = PredictionService::load(&storage, &config.artifact_names).await;

    let rule = "=".repeat(BANNER_WIDTH);
    if service.is_loaded() {
        println!("\n{}", rule);
        println!("SALARY PREDICTION WEB APP");
        println!("Model loaded successfully!");
        println!("Starting server...");
        println!("{}", rule);
    } else {
        println!("\n{}", rule);
        println!("WARNING: Model not loaded!");
        println!("Please run 'python salary_prediction_model.py' first");
        println!("{}", rule);
    }

    let router = create_router(Arc::new(service));
    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.map_err(|e| {
        let err = PredictorError::ServerError {
            message: format!("failed to bind {}: {}", bind_addr, e),
        };
        tracing::error!("❌ {}", err);
        tracing::error!("💡 {}", err.recovery_suggestion());
        err
    })?;

    tracing::info!("🚀 Listening on http://{}", bind_addr);

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|e| PredictorError::ServerError {
            message: e.to_string(),
        })?;

    Ok(())
}
