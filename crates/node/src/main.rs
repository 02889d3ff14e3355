//! Bridge executor binary

use clap::Parser;
use opbridge_node::ExecutorNodeConfig;

#[tokio::main]
async fn main() {
    init_tracing_subscriber();

    let config = ExecutorNodeConfig::parse();
    if let Err(err) = opbridge_node::run(config).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber, filtering from `RUST_LOG` and defaulting to `info`.
fn init_tracing_subscriber() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
