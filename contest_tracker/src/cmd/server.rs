use crate::{
    cmd::load_source_config,
    modules::handlers::{contests, liveness, past_contests},
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{HeaderName, HeaderValue, Method},
    routing, Router, Server,
};
use clap::Args;
use contest_tracker_libs::{ContestResolver, SOURCE_HEADER};
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use url::Url;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let config = load_source_config()?;
    let resolver = ContestResolver::from_config(&config).with_context(|| {
        let message = "couldn't create contest resolver. check the upstream settings.";
        tracing::error!(message);
        message
    })?;

    let origin = match env::var("FRONTEND_ORIGIN_URL") {
        Ok(origin) => Some(parse_origin(&origin)?),
        Err(_) => {
            tracing::warn!("FRONTEND_ORIGIN_URL environment variable is not set. Requests from any origin will be allowed.");
            None
        }
    };

    let app = create_router(Arc::new(resolver), origin);
    let port = match args.port {
        Some(port) => port,
        None => match env::var("PORT") {
            Ok(port) => port.parse::<u16>().with_context(|| {
                let message = format!("PORT must be a port number, got `{}`", port);
                tracing::error!(message);
                message
            })?,
            Err(_) => {
                tracing::warn!("API server will be launched at default port number 8000");
                8000u16
            }
        },
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to bind server")?;

    Ok(())
}

fn parse_origin(origin: &str) -> Result<HeaderValue> {
    let url = Url::parse(origin).with_context(|| {
        let message = format!("FRONTEND_ORIGIN_URL `{}` is not a valid url", origin);
        tracing::error!(message);
        message
    })?;
    let value = HeaderValue::from_str(&url.origin().ascii_serialization())?;
    Ok(value)
}

pub fn create_router(resolver: Arc<ContestResolver>, origin: Option<HeaderValue>) -> Router {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::from(Any),
    };

    Router::new()
        .route("/contests", routing::get(contests))
        .route("/pastcontests", routing::get(past_contests))
        .route("/api/liveness", routing::get(liveness))
        .layer(Extension(resolver))
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods([Method::GET])
                .expose_headers([HeaderName::from_static(SOURCE_HEADER)]),
        )
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown.");
}
