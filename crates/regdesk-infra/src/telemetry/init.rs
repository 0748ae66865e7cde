use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "regdesk=debug,tower_http=info";

/// Initialize tracing.
///
/// `RUST_LOG` overrides the default filter. Production emits JSON lines,
/// every other environment the human-readable format.
pub fn init_telemetry(
    service_name: &str,
    service_version: &str,
    environment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| fmt::layer().json().with_current_span(true)))
        .with((!json).then(fmt::layer))
        .try_init()?;

    tracing::info!(
        service = service_name,
        version = service_version,
        environment = environment,
        json_logs = json,
        "Telemetry initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
