//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, cookies)
//!     → segments.rs (trim slashes and suffix, split, decode)
//!     → language.rs (consume language prefix / cookie / default)
//!     → resolver.rs (controller, action, method naming, fallback)
//!     → Found: dispatcher.rs builds ActionContext, invokes action,
//!              contains faults, records DispatchInfo
//!     → Missed: continuation (next handler) runs unchanged
//! ```
//!
//! # Design Decisions
//! - Per-request data is passed explicitly; shared handles are immutable
//! - Resolution is deterministic and side-effect free
//! - Nothing an action does escapes the dispatcher as an error

pub mod context;
pub mod delegate;
pub mod dispatcher;
pub mod error;
pub mod language;
pub mod naming;
pub mod resolver;
pub mod segments;

pub use context::{ActionContext, Continuation, DispatchInfo, Invocation};
pub use delegate::Delegate;
pub use dispatcher::{dispatch_middleware, Dispatcher};
pub use error::{ActionError, DispatchError};
pub use language::{LanguageSource, ResolvedLanguage};
pub use resolver::{Miss, Outcome, Resolution, Resolved};
