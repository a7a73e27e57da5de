//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, request ID, trace, timeout)
//!     → delegate routes (fixed controller actions)
//!     → dispatcher middleware (segment-based dispatch)
//!     → not-found fallback (continuation of last resort)
//! ```

pub mod server;

pub use server::HttpServer;
