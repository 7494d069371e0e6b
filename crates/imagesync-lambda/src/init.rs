// Logging/tracing setup shared by the Lambda and the operator CLI

use imagesync_config::{LogFormat, LogSettings};
use std::io::IsTerminal;

/// Initialize tracing from the resolved log settings
pub fn init_tracing(settings: &LogSettings) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Lambda reuses warm processes; a second init must not panic
    let _ = match settings.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_current_span(false)),
        ),
        // CloudWatch shows escape codes literally
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_ansi(std::io::stdout().is_terminal())),
        ),
    };
}

/// Build identification embedded by build.rs
pub fn build_info() -> (&'static str, &'static str, &'static str) {
    (
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
    )
}
