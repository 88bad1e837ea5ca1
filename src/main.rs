use sms_gateway::server::{ServerConfig, serve};
use sms_gateway::{GatewayConfig, SmsGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sms_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let config = GatewayConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;
    let gateway = SmsGateway::from_config(&config)?;

    serve(gateway, &server_config).await?;

    Ok(())
}
