use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// 函式庫與兩個執行檔各自有自己的 target
const LOG_TARGETS: [&str; 3] = ["salary_predictor", "predict_salary", "salary_data"];

fn directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

// RUST_LOG 優先，其次是設定檔的 level
fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match (verbose, level) {
        (true, _) => EnvFilter::new(format!("{},info", directives("debug"))),
        (false, Some(level)) => EnvFilter::new(directives(level)),
        (false, None) => EnvFilter::new(directives("info")),
    })
}

pub fn init_cli_logger(verbose: bool) {
    init_compact(build_filter(verbose, None));
}

/// 依設定的格式與等級初始化日誌
pub fn init_logger(format: &str, level: Option<&str>, verbose: bool) {
    let filter = build_filter(verbose, level);
    match format {
        "json" => init_json(filter),
        _ => init_compact(filter),
    }
}

// 日誌一律寫到 stderr，stdout 保留給報表與批次 CSV
fn init_compact(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn init_json(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 伺服器部署時方便收集
        )
        .init();
}
