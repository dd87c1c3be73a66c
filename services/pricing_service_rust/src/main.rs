use anyhow::Result;
use dotenv::dotenv;
use pricing_service_rust::{PricingService, PricingServiceConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting pricing_service_rust...");

    let config = PricingServiceConfig::from_env()?;
    let mut service = PricingService::new(config).await?;

    service.run().await
}
