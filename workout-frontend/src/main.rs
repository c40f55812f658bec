use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use workout_core::{LoginPolicy, WebhookClient};
use workout_frontend::config::get_configuration;
use workout_frontend::services::metrics::{init_metrics, WebhookMetrics};
use workout_frontend::startup::build_router;
use workout_frontend::utils::init_tracing;
use workout_frontend::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(&configuration.telemetry)?;

    init_metrics().map_err(|e| anyhow::anyhow!("Failed to register metrics: {}", e))?;

    let policy = LoginPolicy {
        dev_bypass: configuration.auth.dev_bypass,
    };
    if policy.dev_bypass && !policy.allows_bypass() {
        tracing::warn!("auth.dev_bypass is set but ignored by release builds");
    } else if policy.allows_bypass() {
        tracing::warn!("Development login bypass is enabled");
    }

    let webhooks = Arc::new(
        WebhookClient::new(configuration.webhooks.clone()).with_observer(Arc::new(WebhookMetrics)),
    );
    info!(
        base_url = %webhooks.settings().base_url,
        "Webhook client configured"
    );

    let app = build_router(AppState::new(webhooks.clone(), policy), &configuration.server);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting workout-frontend on {}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(webhooks))
        .await
        .map_err(|e| {
            tracing::error!("Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })?;

    opentelemetry::global::shutdown_tracer_provider();
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, aborting webhook calls still in flight.
async fn shutdown_signal(webhooks: Arc<WebhookClient>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, cancelling webhook calls");
    webhooks.shutdown();
}
