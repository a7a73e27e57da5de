//! Convention-based controller/action dispatcher for axum.
//!
//! Request paths map onto controllers and actions by position:
//!
//! ```text
//! /[language]/[controller]/[action]/[param]/[param]...[suffix]
//! ```
//!
//! Missing segments fall back to the configured defaults, unknown
//! controllers or actions pass the request on to the next handler, and
//! [`UrlBuilder`] renders the inverse mapping.

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod registry;
pub mod urls;

// Hosting
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use dispatch::{
    dispatch_middleware, ActionContext, ActionError, Continuation, Delegate, DispatchError,
    DispatchInfo, Dispatcher, Invocation,
};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{
    ControllerHandle, ControllerProvider, ControllerRegistry, DirectoryProvider, StaticControllers,
};
pub use urls::{UrlBuilder, UrlParams, UrlSpec};
