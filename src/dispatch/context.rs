//! Per-request context handed to actions.
//!
//! Everything an action may need about the current request travels here, so
//! concurrent requests to the same controller never share mutable state.

use std::fmt;

use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::registry::InjectedValues;
use crate::urls::{UrlBuilder, UrlSpec};

/// Controller and action that served a response.
///
/// Inserted into the response extensions by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchInfo {
    pub language: Option<String>,
    pub controller: String,
    pub action: String,
}

/// Request data and resolved names for one action call.
#[derive(Clone)]
pub struct ActionContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Resolved language, `None` when i18n is disabled.
    pub language: Option<String>,
    pub controller: String,
    pub action: String,
    injected: InjectedValues,
    urls: UrlBuilder,
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("language", &self.language)
            .field("controller", &self.controller)
            .field("action", &self.action)
            .finish()
    }
}

impl ActionContext {
    pub(crate) fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        info: &DispatchInfo,
        injected: InjectedValues,
        urls: UrlBuilder,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            language: info.language.clone(),
            controller: info.controller.clone(),
            action: info.action.clone(),
            injected,
            urls,
        }
    }

    /// A value from the configured injected values.
    pub fn injected(&self, name: &str) -> Option<&serde_json::Value> {
        self.injected.get(name)
    }

    pub fn injected_values(&self) -> &InjectedValues {
        &self.injected
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Build a URL, defaulting the language to this request's language.
    pub fn url_for(&self, mut spec: UrlSpec) -> String {
        if spec.language.is_none() {
            spec.language = self.language.clone();
        }
        self.urls.build(&spec)
    }
}

/// Arguments of one action call.
#[derive(Debug)]
pub struct Invocation {
    pub context: ActionContext,
    /// Remaining path segments, in order.
    pub params: Vec<String>,
    /// The full request; only handed over under the context-then-positional
    /// calling convention.
    pub request: Option<Request>,
    /// The continuation; only handed over under the context-then-positional
    /// calling convention.
    pub next: Option<Continuation>,
}

impl Invocation {
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// "Pass control to the next handler".
///
/// Wraps the host's [`Next`]; a terminal continuation (used by delegates,
/// which sit at the end of a route) answers 404 instead.
pub struct Continuation {
    next: Option<Next>,
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("terminal", &self.is_terminal())
            .finish()
    }
}

impl Continuation {
    pub fn new(next: Next) -> Self {
        Self { next: Some(next) }
    }

    pub fn terminal() -> Self {
        Self { next: None }
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    pub async fn run(self, request: Request) -> Response {
        match self.next {
            Some(next) => next.run(request).await,
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl From<Next> for Continuation {
    fn from(next: Next) -> Self {
        Self::new(next)
    }
}
