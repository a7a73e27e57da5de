//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick the filter from `RUST_LOG`, else from the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Library code only emits events; installing a subscriber is the binary's job

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "controller_dispatch={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
