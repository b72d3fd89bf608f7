use actix_web::{HttpServer, web};
use signature_gateway::{
    AppMetrics, MetricsConfig, ServerConfig, SignatureConfig, SignatureScheme, SignatureVerifier,
    create_app,
};
use std::{io, sync::Arc};
use tracing_subscriber::EnvFilter;

/// Initialize logging. `RUST_LOG` sets the filter, `LOG_FORMAT=json` switches
/// to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    // Refuse to start without a usable verifier
    let verifier = SignatureConfig::from_env()
        .and_then(|config| SignatureVerifier::from_config(&config))
        .map_err(|e| {
            tracing::error!(error = %e, "Invalid signature configuration");
            io::Error::new(io::ErrorKind::InvalidInput, e)
        })?;

    if verifier.scheme() == SignatureScheme::Legacy {
        tracing::warn!(
            "Legacy signature scheme enabled: signatures do not authenticate header values"
        );
    }

    let metrics = AppMetrics::new()
        .map(web::Data::new)
        .map_err(io::Error::other)?;
    let metrics_config = MetricsConfig::from_env();
    let server_config = ServerConfig::from_env();

    tracing::info!(
        bind_addr = %server_config.bind_addr,
        signed_headers = ?verifier.headers(),
        scheme = %verifier.scheme(),
        "Signature gateway starting"
    );

    let verifier = Arc::new(verifier);

    HttpServer::new(move || {
        create_app(
            Arc::clone(&verifier),
            metrics.clone(),
            metrics_config.clone(),
        )
    })
    .bind(&server_config.bind_addr)?
    .run()
    .await
}
