//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceExt;

use controller_dispatch::config::AppConfig;
use controller_dispatch::registry::{ControllerHandle, ControllerRegistry, StaticControllers};
use controller_dispatch::{dispatch_middleware, ActionError, Dispatcher, Invocation};

async fn home(_inv: Invocation) -> Result<&'static str, ActionError> {
    Ok("home")
}

async fn about(inv: Invocation) -> Result<String, ActionError> {
    Ok(format!("about:{}", inv.context.language.as_deref().unwrap_or("-")))
}

async fn users(_inv: Invocation) -> Result<&'static str, ActionError> {
    Ok("users")
}

async fn show(inv: Invocation) -> Result<String, ActionError> {
    Ok(format!("show:{}", inv.params.join(",")))
}

async fn get_list(_inv: Invocation) -> Result<&'static str, ActionError> {
    Ok("get_list")
}

async fn post_list(_inv: Invocation) -> Result<&'static str, ActionError> {
    Ok("post_list")
}

/// Echoes language, controller, action and params.
async fn echo(inv: Invocation) -> Result<String, ActionError> {
    let ctx = &inv.context;
    Ok(format!(
        "{}|{}|{}|{}",
        ctx.language.as_deref().unwrap_or("-"),
        ctx.controller,
        ctx.action,
        inv.params.join(",")
    ))
}

async fn fails(_inv: Invocation) -> Result<&'static str, ActionError> {
    Err(ActionError::msg("database unavailable"))
}

async fn panics(_inv: Invocation) -> Result<&'static str, ActionError> {
    panic!("kaboom")
}

async fn site_name(inv: Invocation) -> Result<String, ActionError> {
    Ok(inv
        .context
        .injected("site_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unnamed")
        .to_string())
}

/// Hands the request on to the next handler and tags the result.
async fn pass(mut inv: Invocation) -> Result<Response, ActionError> {
    let (Some(request), Some(next)) = (inv.request.take(), inv.next.take()) else {
        return Err(ActionError::msg("request and continuation not handed over"));
    };
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("x-passed-by", "chain.pass".parse().unwrap());
    Ok(response)
}

pub fn controllers() -> Vec<ControllerHandle> {
    vec![
        ControllerHandle::builder("main")
            .action("index", home)
            .action("about", about)
            .action("site", site_name)
            .build(),
        ControllerHandle::builder("users")
            .action("index", users)
            .action("show", show)
            .action("get_list", get_list)
            .action("post_list", post_list)
            .build(),
        ControllerHandle::builder("blog").action("post", echo).build(),
        ControllerHandle::builder("faulty")
            .action("fails", fails)
            .action("panics", panics)
            .build(),
        ControllerHandle::builder("chain").action("pass", pass).build(),
    ]
}

pub fn config(configure: impl FnOnce(&mut AppConfig)) -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    configure(&mut config);
    Arc::new(config)
}

/// Enable i18n with en (default), de and fr.
pub fn with_languages(config: &mut AppConfig) {
    config.i18n.enabled = true;
    config.i18n.default_language = "en".into();
    config.i18n.supported_languages = BTreeSet::from(["en".into(), "de".into(), "fr".into()]);
}

pub fn dispatcher(config: Arc<AppConfig>) -> Dispatcher {
    let injected = Arc::new(config.dispatch.injected.clone());
    let provider: StaticControllers = controllers().into_iter().collect();
    Dispatcher::new(config, ControllerRegistry::build(&provider, injected))
}

/// Router whose fallback counts how often the continuation ran.
pub fn app(dispatcher: Dispatcher) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new()
        .fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (StatusCode::NOT_FOUND, "fallback").into_response()
            }
        })
        .layer(middleware::from_fn_with_state(dispatcher, dispatch_middleware));
    (router, hits)
}

pub fn get(path: &str) -> Request {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn with_cookie(path: &str, cookie: &str) -> Request {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(router: &Router, request: Request) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}
