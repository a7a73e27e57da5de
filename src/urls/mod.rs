//! URL generation subsystem.
//!
//! # Data Flow
//! ```text
//! UrlSpec (controller, action, params, language, suffix)
//!     → builder.rs (apply defaults, encode, render)
//!     → compare with rendered site root
//!     → path string
//! ```

pub mod builder;

pub use builder::{UrlBuilder, UrlParams, UrlSpec};
