// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use coffee_shop_server::{
    api::router,
    auth::{JwksManager, TokenVerifier},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::DrinkDatabase,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    let jwks = JwksManager::new(&config.auth.jwks_url, config.auth.jwks_timeout)?
        .with_cache_ttl(config.auth.jwks_cache_ttl);
    let verifier = TokenVerifier::new(jwks, &config.auth.issuer, &config.auth.audience)
        .with_leeway(config.auth.leeway_secs);
    tracing::info!(
        issuer = %config.auth.issuer,
        audience = %config.auth.audience,
        jwks_url = %config.auth.jwks_url,
        "Token verification configured"
    );

    let db = DrinkDatabase::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Drink store opened");

    let app = router(AppState::new(db, verifier));

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections");
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    let addr = config.bind_addr;
    match &config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            tracing::info!(%addr, "Coffee shop server listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(%addr, "Coffee shop server listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}
