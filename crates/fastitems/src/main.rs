use fastitems::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    fastitems::logging::init(&config);

    info!(
        addr = %config.addr(),
        body_limit = config.body_limit,
        "starting fastitems"
    );
    fastitems::app(&config).run(&config.addr()).await?;
    Ok(())
}
