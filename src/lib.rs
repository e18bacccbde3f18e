pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ocr;
pub mod pipeline;
pub mod preprocess;
pub mod scanner;
pub mod vocabulary;

pub use inventory_ocr_common as common;

/// ログ出力を初期化する（`RUST_LOG` があれば優先）
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
