//! Fixed bindings of one controller action to a host route.
//!
//! A delegate skips segment resolution but keeps the dispatcher's language
//! handling and fault containment. Its action receives no positional params
//! and a terminal continuation.

use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::dispatch::dispatcher::Dispatcher;
use crate::registry::ControllerHandle;

/// One controller action bound to a route.
#[derive(Clone)]
pub struct Delegate {
    dispatcher: Dispatcher,
    controller: Arc<ControllerHandle>,
    action: String,
}

impl std::fmt::Debug for Delegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("controller", &self.controller.name())
            .field("action", &self.action)
            .finish()
    }
}

impl Delegate {
    pub(crate) fn new(dispatcher: Dispatcher, controller: Arc<ControllerHandle>, action: String) -> Self {
        Self {
            dispatcher,
            controller,
            action,
        }
    }

    pub fn controller(&self) -> &str {
        self.controller.name()
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Run the bound action for `request`.
    pub async fn handle(self, request: Request) -> Response {
        self.dispatcher
            .dispatch_fixed(self.controller, self.action, request)
            .await
    }

    /// An axum handler, e.g. `Router::new().route("/about", get(delegate.into_handler()))`.
    pub fn into_handler(
        self,
    ) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
        move |request: Request| self.clone().handle(request).boxed()
    }
}
