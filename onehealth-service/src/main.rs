use std::sync::Arc;

use onehealth_core::GeminiBackend;
use onehealth_service::create_app;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The external-service credential is consumed once, at process start.
    let backend = match GeminiBackend::from_env() {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let app = create_app(Arc::new(backend));
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    let addr = listener.local_addr()?;

    info!("One Health platform service starting on {}", addr);
    info!("Health check endpoint: http://{}/health", addr);
    info!("Disease catalog: http://{}/diseases", addr);
    info!("Chat endpoint: POST http://{}/chat/sessions", addr);
    info!("Prediction endpoint: POST http://{}/predictions", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
