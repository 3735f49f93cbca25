use adventure_aggregator::{AggregatorConfig, VERSION, web};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AggregatorConfig::load()?;
    init_tracing(&config);

    tracing::info!(version = VERSION, "Starting adventure aggregation service");
    web::run(&config).await
}

fn init_tracing(config: &AggregatorConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
