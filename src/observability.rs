//! Observability utilities.

use crate::types::ObservabilityConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();
static PROPAGATOR_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// Log format (plain or JSON) and the default level come from config;
/// `RUST_LOG` still overrides the filter when set.
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

        let result = if config.json_logs {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

/// Install the W3C trace-context propagator as the global text-map
/// propagator. Exporter wiring (OTLP endpoint etc.) lives outside this crate.
pub fn init_propagator() {
    PROPAGATOR_INIT.get_or_init(|| {
        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());
    });
}

#[cfg(test)]
mod tests {
    use super::{init_propagator, init_tracing};
    use crate::types::ObservabilityConfig;

    #[test]
    fn init_tracing_is_idempotent_and_config_driven() {
        let plain = ObservabilityConfig::default();
        let json = ObservabilityConfig {
            json_logs: true,
            log_level: "debug".to_string(),
            ..ObservabilityConfig::default()
        };
        // First call wins; the second must be a no-op, not a re-init panic.
        init_tracing(&plain);
        init_tracing(&json);
    }

    #[test]
    fn init_propagator_is_idempotent() {
        init_propagator();
        init_propagator();
    }
}
