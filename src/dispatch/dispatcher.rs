//! Request dispatch.
//!
//! # Responsibilities
//! - Resolve each request to a controller action or pass it on
//! - Build the per-request [`ActionContext`]
//! - Invoke the action under the configured calling convention
//! - Contain action failures at this boundary
//! - Record language and dispatch info on request/response extensions
//!
//! # Design Decisions
//! - The dispatcher is cheap to clone (one Arc) and holds no per-request state
//! - A miss always runs the continuation exactly once and never touches the
//!   response it returns, apart from the language cookie
//! - A failed action always yields a terminated 500 response; the body
//!   carries the diagnostic only in debug mode

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;

use crate::config::{AppConfig, CallingConvention};
use crate::dispatch::context::{ActionContext, Continuation, DispatchInfo, Invocation};
use crate::dispatch::delegate::Delegate;
use crate::dispatch::error::{ActionError, DispatchError};
use crate::dispatch::language::{
    persist_language, resolve_language, stored_language, LanguageSource, ResolvedLanguage,
};
use crate::dispatch::resolver::{resolve, Outcome, Resolution, Resolved};
use crate::dispatch::segments::segment_path;
use crate::observability::metrics;
use crate::registry::{ActionFn, ActionResult, ControllerHandle, ControllerRegistry};
use crate::urls::UrlBuilder;

struct Inner {
    config: Arc<AppConfig>,
    registry: ControllerRegistry,
    urls: UrlBuilder,
}

/// Convention-based controller/action dispatcher.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("controllers", &self.inner.registry.names())
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher. The configuration is fixed for its lifetime.
    pub fn new(config: Arc<AppConfig>, registry: ControllerRegistry) -> Self {
        let urls = UrlBuilder::new(config.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                registry,
                urls,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.inner.registry
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.inner.urls
    }

    /// Resolve without invoking anything.
    pub fn resolve(&self, method: &Method, path: &str, stored_language: Option<&str>) -> Resolution {
        resolve(
            &self.inner.config,
            &self.inner.registry,
            method,
            path,
            stored_language,
        )
    }

    /// Dispatch one request: run the resolved action, or `next` on a miss.
    pub async fn dispatch(&self, mut request: Request, next: Continuation) -> Response {
        let stored = self.stored_language(&request);
        let resolution = self.resolve(request.method(), request.uri().path(), stored.as_deref());

        if let Some(language) = &resolution.language {
            request.extensions_mut().insert(language.clone());
        }

        let response = match resolution.outcome {
            Outcome::Found(resolved) => {
                metrics::record_dispatch("found");
                self.invoke(resolved, resolution.language.as_ref(), request, next)
                    .await
            }
            Outcome::Missed(miss) => {
                tracing::debug!(
                    path = %request.uri().path(),
                    reason = miss.reason(),
                    miss = ?miss,
                    "No controller action, passing request on"
                );
                metrics::record_dispatch(miss.reason());
                next.run(request).await
            }
        };

        self.finish(response, resolution.language, stored.as_deref())
    }

    /// Bind one controller action to a host route.
    pub fn delegate(&self, controller: &str, action: &str) -> Result<Delegate, DispatchError> {
        let handle = self
            .inner
            .registry
            .get(controller)
            .ok_or_else(|| DispatchError::UnknownController(controller.to_string()))?;
        if !handle.has_action(action) {
            return Err(DispatchError::UnknownAction {
                controller: controller.to_string(),
                action: action.to_string(),
            });
        }
        Ok(Delegate::new(self.clone(), handle.clone(), action.to_string()))
    }

    /// Run a fixed controller action with the dispatcher's language handling
    /// and fault containment. Used by [`Delegate`].
    pub(crate) async fn dispatch_fixed(
        &self,
        controller: Arc<ControllerHandle>,
        action: String,
        mut request: Request,
    ) -> Response {
        let stored = self.stored_language(&request);
        let language = {
            let config = &self.inner.config;
            let mut segments: VecDeque<String> =
                segment_path(request.uri().path(), &config.dispatch.path_suffix).into();
            resolve_language(&config.i18n, &mut segments, stored.as_deref())
        };
        if let Some(language) = &language {
            request.extensions_mut().insert(language.clone());
        }

        let resolved = Resolved {
            controller,
            action,
            params: Vec::new(),
        };
        let response = self
            .invoke(resolved, language.as_ref(), request, Continuation::terminal())
            .await;
        self.finish(response, language, stored.as_deref())
    }

    fn stored_language(&self, request: &Request) -> Option<String> {
        let i18n = &self.inner.config.i18n;
        if !i18n.enabled {
            return None;
        }
        stored_language(request.headers(), &i18n.cookie_name)
    }

    /// Record the language on the response and persist a language chosen
    /// through the path.
    fn finish(
        &self,
        mut response: Response,
        language: Option<ResolvedLanguage>,
        stored: Option<&str>,
    ) -> Response {
        if let Some(language) = language {
            if language.source == LanguageSource::Path && stored != Some(language.code.as_str()) {
                persist_language(
                    response.headers_mut(),
                    &self.inner.config.i18n.cookie_name,
                    &language.code,
                );
            }
            response.extensions_mut().insert(language);
        }
        response
    }

    async fn invoke(
        &self,
        resolved: Resolved,
        language: Option<&ResolvedLanguage>,
        request: Request,
        next: Continuation,
    ) -> Response {
        let Resolved {
            controller,
            action,
            params,
        } = resolved;

        let action_fn = match controller.action(&action) {
            Some(action_fn) => action_fn.clone(),
            None => {
                // Resolution only yields registered actions.
                tracing::error!(controller = %controller.name(), action = %action, "Resolved action vanished");
                return next.run(request).await;
            }
        };

        let info = DispatchInfo {
            language: language.map(|l| l.code.clone()),
            controller: controller.name().to_string(),
            action,
        };

        let invocation = match self.inner.config.dispatch.calling_convention {
            CallingConvention::Positional => {
                let (parts, _body) = request.into_parts();
                Invocation {
                    context: self.context(parts.method, parts.uri, parts.headers, &info, &controller),
                    params,
                    request: None,
                    next: None,
                }
            }
            CallingConvention::ContextThenPositional => Invocation {
                context: self.context(
                    request.method().clone(),
                    request.uri().clone(),
                    request.headers().clone(),
                    &info,
                    &controller,
                ),
                params,
                request: Some(request),
                next: Some(next),
            },
        };

        tracing::debug!(
            controller = %info.controller,
            action = %info.action,
            language = ?info.language,
            params = invocation.params.len(),
            "Dispatching to action"
        );

        let mut response = match run_action(&action_fn, invocation).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    controller = %info.controller,
                    action = %info.action,
                    error = %error,
                    "Action failed"
                );
                metrics::record_action_fault(&info.controller);
                fault_response(&error, self.inner.config.dispatch.debug)
            }
        };

        response.extensions_mut().insert(info);
        response
    }

    fn context(
        &self,
        method: Method,
        uri: axum::http::Uri,
        headers: axum::http::HeaderMap,
        info: &DispatchInfo,
        controller: &ControllerHandle,
    ) -> ActionContext {
        ActionContext::new(
            method,
            uri,
            headers,
            info,
            controller.injected().clone(),
            self.inner.urls.clone(),
        )
    }
}

/// Run an action, turning both errors and panics into `Err`.
async fn run_action(action: &ActionFn, invocation: Invocation) -> ActionResult {
    let future = match std::panic::catch_unwind(AssertUnwindSafe(|| action(invocation))) {
        Ok(future) => future,
        Err(payload) => return Err(ActionError::from_panic(payload)),
    };
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ActionError::from_panic(payload)),
    }
}

/// Terminated response for a failed action.
fn fault_response(error: &ActionError, debug: bool) -> Response {
    if debug {
        (StatusCode::INTERNAL_SERVER_ERROR, error.diagnostic()).into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Axum middleware entry point.
///
/// ```ignore
/// let app = Router::new()
///     .fallback(not_found)
///     .layer(middleware::from_fn_with_state(dispatcher, dispatch_middleware));
/// ```
pub async fn dispatch_middleware(
    State(dispatcher): State<Dispatcher>,
    request: Request,
    next: Next,
) -> Response {
    dispatcher.dispatch(request, Continuation::new(next)).await
}
