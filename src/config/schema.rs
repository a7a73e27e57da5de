//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher
//! and the server that hosts it. All types derive Serde traits for
//! deserialization from config files; every field has a default so that an
//! empty file (or no file at all) yields a working configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Controller/action resolution settings.
    pub dispatch: DispatchConfig,

    /// Language prefix handling.
    pub i18n: I18nConfig,

    /// URL generation settings.
    pub urls: UrlConfig,

    /// Fixed routes bound to a single controller action.
    pub delegates: Vec<DelegateConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How an HTTP method is folded into an action name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodNaming {
    /// Action names are used as-is.
    #[default]
    None,
    /// `get` + `Users` = `getUsers`.
    CamelCase,
    /// `get` + `_` + `users` = `get_users`.
    Underscored,
    /// `get` + `users` = `getusers`.
    Joined,
}

/// What an action receives besides its per-request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CallingConvention {
    /// Context plus the remaining path segments.
    #[default]
    Positional,
    /// Additionally hands over the full request and the continuation.
    ContextThenPositional,
}

/// Controller/action resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Directory enumerated for controller units.
    pub controller_directory: String,

    /// Controller used when the path has no controller segment.
    pub default_controller: String,

    /// Action used when the path has no action segment.
    pub default_action: String,

    /// Trailing suffix stripped from paths and appended to generated URLs
    /// (e.g. ".html"). Empty disables it.
    pub path_suffix: String,

    /// Expose action fault diagnostics in response bodies.
    pub debug: bool,

    /// Values made available to every action through its context.
    pub injected: BTreeMap<String, serde_json::Value>,

    /// HTTP method folding for action names.
    pub method_naming: MethodNaming,

    /// Argument passing convention for actions.
    pub calling_convention: CallingConvention,

    /// Re-read unknown controller/action segments against the defaults
    /// instead of passing the request on.
    pub segment_fallback: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            controller_directory: "controllers".to_string(),
            default_controller: "main".to_string(),
            default_action: "index".to_string(),
            path_suffix: String::new(),
            debug: false,
            injected: BTreeMap::new(),
            method_naming: MethodNaming::None,
            calling_convention: CallingConvention::Positional,
            segment_fallback: false,
        }
    }
}

/// Language prefix handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Enable language prefixes.
    pub enabled: bool,

    /// Language used when neither the path nor the cookie selects one.
    pub default_language: String,

    /// Language codes accepted as a leading path segment.
    pub supported_languages: BTreeSet<String>,

    /// Cookie that remembers the last language selected through the path.
    pub cookie_name: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_language: "en".to_string(),
            supported_languages: BTreeSet::from(["en".to_string()]),
            cookie_name: "lang".to_string(),
        }
    }
}

impl I18nConfig {
    /// Returns true if `code` is an accepted language prefix.
    pub fn supports(&self, code: &str) -> bool {
        self.supported_languages.contains(code)
    }
}

/// URL generation settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UrlConfig {
    /// Prefix of every generated URL (e.g. "https://example.com" or "/app").
    pub base: String,
}

/// A fixed route that always invokes one controller action.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegateConfig {
    /// Host route path (axum syntax, e.g. "/about").
    pub path: String,

    /// Controller name in the registry.
    pub controller: String,

    /// Action name on that controller.
    pub action: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
