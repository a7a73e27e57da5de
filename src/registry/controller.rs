//! Controller handles and their action sets.
//!
//! # Responsibilities
//! - Store a controller's actions keyed by name
//! - Answer explicit found/not-found lookups
//! - Carry the injected values attached by the registry
//!
//! # Design Decisions
//! - A handle is immutable once registered; nothing about a request is ever
//!   written onto it. Per-request data travels in [`Invocation`].
//! - Actions are async closures boxed behind `Arc`, so cloning a handle is cheap

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::dispatch::context::Invocation;
use crate::dispatch::error::ActionError;

/// Outcome of running an action.
pub type ActionResult = Result<Response, ActionError>;

/// A type-erased action.
pub type ActionFn = Arc<dyn Fn(Invocation) -> BoxFuture<'static, ActionResult> + Send + Sync>;

/// Shared values handed to every action through its context.
pub type InjectedValues = Arc<BTreeMap<String, serde_json::Value>>;

/// A named group of actions addressable by one path segment.
#[derive(Clone)]
pub struct ControllerHandle {
    name: String,
    actions: HashMap<String, ActionFn>,
    injected: InjectedValues,
}

impl fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ControllerHandle")
            .field("name", &self.name)
            .field("actions", &actions)
            .finish()
    }
}

impl ControllerHandle {
    /// Start building a controller named `name`.
    pub fn builder(name: impl Into<String>) -> ControllerBuilder {
        ControllerBuilder {
            name: name.into(),
            actions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an action by exact name.
    pub fn action(&self, name: &str) -> Option<&ActionFn> {
        self.actions.get(name)
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Action names, sorted.
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn injected(&self) -> &InjectedValues {
        &self.injected
    }

    pub(crate) fn attach(&mut self, injected: InjectedValues) {
        self.injected = injected;
    }
}

/// Builder for [`ControllerHandle`].
pub struct ControllerBuilder {
    name: String,
    actions: HashMap<String, ActionFn>,
}

impl ControllerBuilder {
    /// Register an action. Registering the same name twice replaces the
    /// earlier action.
    pub fn action<F, Fut, R>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActionError>> + Send + 'static,
        R: IntoResponse,
    {
        let action: ActionFn = Arc::new(move |invocation| {
            let fut = action(invocation);
            Box::pin(async move { fut.await.map(IntoResponse::into_response) })
        });
        self.actions.insert(name.into(), action);
        self
    }

    pub fn build(self) -> ControllerHandle {
        ControllerHandle {
            name: self.name,
            actions: self.actions,
            injected: InjectedValues::default(),
        }
    }
}
