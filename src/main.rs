use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use helena_llamas_web::config::{Settings, SubmitterSettings};
use helena_llamas_web::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("helena_llamas_web=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let settings = Settings::from_env().context("Invalid configuration")?;
    match &settings.submitter {
        SubmitterSettings::Simulated { delay } => {
            info!("Booking submissions are simulated ({} ms delay)", delay.as_millis())
        }
        SubmitterSettings::Http { url, max_attempts, .. } => {
            info!("Booking submissions go to {} ({} attempts)", url, max_attempts)
        }
    }
    info!(
        "Pricing: ${}/llama/day, {}% off trips over {} days, clinic ${}, trailer ${}/day",
        settings.pricing.daily_rate_per_animal,
        settings.pricing.discount_percent(),
        settings.pricing.long_trip_threshold_days,
        settings.pricing.clinic_flat_fee,
        settings.pricing.trailer_daily_rate,
    );

    let state = AppState::new(&settings).context("Failed to build booking submitter")?;
    let router = app(state);

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
