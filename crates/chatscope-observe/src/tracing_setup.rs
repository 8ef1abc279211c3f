//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use chatscope_types::config::LoggingConfig;
//!
//! chatscope_observe::tracing_setup::init_tracing(&LoggingConfig::default(), None).unwrap();
//! ```

use chatscope_types::config::{LogFormat, LoggingConfig};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Pick the filter directive.
///
/// Priority: an explicit override (CLI verbosity flags), then `RUST_LOG`,
/// then the configured filter.
pub fn filter_directive(
    config: &LoggingConfig,
    override_filter: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    override_filter
        .or(rust_log.filter(|s| !s.trim().is_empty()))
        .unwrap_or(&config.filter)
        .to_string()
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer writing to stderr, human-readable or JSON per
///   `config.format`, so command output on stdout stays machine-readable.
/// - When `config.otel` is set, additionally bridges spans to OpenTelemetry
///   using a stdout exporter.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(
    config: &LoggingConfig,
    override_filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = EnvFilter::new(filter_directive(config, override_filter, rust_log.as_deref()));

    let (text_layer, json_layer) = match config.format {
        LogFormat::Text => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    let otel_layer = if config.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("chatscope");

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// No-op when OTel was not enabled.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filter: &str) -> LoggingConfig {
        LoggingConfig {
            filter: filter.to_string(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn test_filter_uses_config_by_default() {
        assert_eq!(filter_directive(&config("info"), None, None), "info");
    }

    #[test]
    fn test_rust_log_beats_config() {
        assert_eq!(
            filter_directive(&config("info"), None, Some("chatscope_core=trace")),
            "chatscope_core=trace"
        );
        // Blank RUST_LOG is treated as unset.
        assert_eq!(filter_directive(&config("info"), None, Some("  ")), "info");
    }

    #[test]
    fn test_override_beats_everything() {
        assert_eq!(
            filter_directive(&config("info"), Some("error"), Some("debug")),
            "error"
        );
    }
}
