//! MRS Forms Web Server.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Builds the SMTP transport for the firm's mail account
//! - Checks the relay once in the background and logs the result
//! - Serves the forms API until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::Request, ServiceExt};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mrs_forms::{router, AppState, Config, Dispatcher, SmtpMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Read .env before the filter so RUST_LOG can live there too
    dotenvy::dotenv().ok();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();

    info!(
        port = config.port,
        frontend_url = %config.frontend_url,
        email_user_configured = !config.mail.account.trim().is_empty(),
        email_password_configured = !config.mail.app_password.is_empty(),
        firm_email_configured = !config.mail.firm_address.trim().is_empty(),
        smtp_host = %config.mail.smtp_host,
        rate_limit_max = config.rate_limit.max_requests,
        rate_limit_window_secs = config.rate_limit.window.as_secs(),
        trust_proxy = config.trust_proxy,
        "config_loaded"
    );

    // Create the mail transport and dispatcher
    let mailer = SmtpMailer::new(&config.mail).context("Failed to create SMTP transport")?;
    let dispatcher = Dispatcher::new(Arc::new(mailer), &config.mail);

    // Self-check never blocks startup
    let probe = dispatcher.clone();
    tokio::spawn(async move {
        match probe.verify().await {
            Ok(()) => info!("email_connection_ok"),
            Err(e) => error!(error = %e, "email_connection_failed"),
        }
    });

    // Create application state and router
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, dispatcher);
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, health = "/api/health", "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
