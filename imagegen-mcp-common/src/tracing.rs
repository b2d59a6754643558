//! Tracing initialization for the image generation server.
//!
//! All log output goes to stderr. Stdout is the MCP protocol channel when the
//! server runs with the stdio transport, and a stray log line there would
//! corrupt the JSON-RPC stream.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=imagegen_mcp_server=debug` - Enable debug for the server crate
//!   - `RUST_LOG=warn,imagegen_mcp_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
}

/// Initialize the tracing subscriber, defaulting to `info` when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize tracing with a custom default level.
///
/// ```no_run
/// use imagegen_mcp_common::tracing::init_tracing_with_default;
///
/// init_tracing_with_default("debug");
/// ```
pub fn init_tracing_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Useful in tests, where several cases may race to install the subscriber.
pub fn try_init_tracing() -> Result<(), ()> {
    tracing_subscriber::registry()
        .with(build_filter("info"))
        .with(stderr_layer())
        .try_init()
        .map_err(|_| ())
}
