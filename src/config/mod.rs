//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, reported as warnings)
//!     → AppConfig (immutable)
//!     → shared via Arc with the dispatcher and URL builder
//! ```
//!
//! # Design Decisions
//! - Config is set once at startup and never mutated
//! - All fields have defaults to allow minimal configs
//! - Validation never rejects a config; it only reports

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, CallingConvention, DelegateConfig, DispatchConfig, I18nConfig, ListenerConfig,
    MethodNaming, ObservabilityConfig, TimeoutConfig, UrlConfig,
};
pub use validation::{validate_config, ValidationIssue};
