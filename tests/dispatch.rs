//! End-to-end dispatch through the axum middleware.

mod common;

use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::Router;

use controller_dispatch::config::{CallingConvention, MethodNaming};
use controller_dispatch::dispatch::{LanguageSource, ResolvedLanguage};
use controller_dispatch::{DispatchError, DispatchInfo};

use common::{app, body_string, config, dispatcher, send, set_cookies, with_cookie, with_languages};

#[tokio::test]
async fn test_defaults_and_params() {
    let (router, hits) = app(dispatcher(config(|_| {})));

    let response = send(&router, common::get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "home");

    let response = send(&router, common::get("/users")).await;
    assert_eq!(body_string(response).await, "users");

    let response = send(&router, common::get("/users/show/7/8/")).await;
    assert_eq!(body_string(response).await, "show:7,8");

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_miss_runs_continuation_once() {
    let (router, hits) = app(dispatcher(config(|_| {})));

    let response = send(&router, common::get("/nothing/here")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "fallback");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let response = send(&router, common::get("/users/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.extensions().get::<DispatchInfo>().is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_dispatch_info_on_response() {
    let (router, _) = app(dispatcher(config(|_| {})));

    let response = send(&router, common::get("/users/show/3")).await;
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!(
        info,
        DispatchInfo {
            language: None,
            controller: "users".into(),
            action: "show".into(),
        }
    );
}

#[tokio::test]
async fn test_path_language_sets_cookie() {
    let (router, _) = app(dispatcher(config(with_languages)));

    let response = send(&router, common::get("/de/blog/post/a%20b")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response), vec!["lang=de; Path=/".to_string()]);
    assert_eq!(
        response.extensions().get::<ResolvedLanguage>(),
        Some(&ResolvedLanguage {
            code: "de".into(),
            source: LanguageSource::Path,
        })
    );
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!(info.language.as_deref(), Some("de"));
    assert_eq!(body_string(response).await, "de|blog|post|a b");
}

#[tokio::test]
async fn test_cookie_language_is_not_rewritten() {
    let (router, _) = app(dispatcher(config(with_languages)));

    let response = send(&router, with_cookie("/main/about", "lang=fr")).await;
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        response.extensions().get::<ResolvedLanguage>().map(|l| l.source),
        Some(LanguageSource::Cookie)
    );
    assert_eq!(body_string(response).await, "about:fr");

    // Same language in path and cookie: nothing to persist.
    let response = send(&router, with_cookie("/de/main/about", "theme=dark; lang=de")).await;
    assert!(set_cookies(&response).is_empty());
    assert_eq!(body_string(response).await, "about:de");

    // A stale cookie for an unsupported language is ignored.
    let response = send(&router, with_cookie("/main/about", "lang=xx")).await;
    assert_eq!(body_string(response).await, "about:en");
}

#[tokio::test]
async fn test_language_without_i18n_is_a_controller_segment() {
    let (router, hits) = app(dispatcher(config(|_| {})));

    let response = send(&router, common::get("/de/users")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_miss_keeps_language_on_request_path() {
    let (router, hits) = app(dispatcher(config(with_languages)));

    let response = send(&router, common::get("/fr/unknown")).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        response.extensions().get::<ResolvedLanguage>().map(|l| l.code.as_str()),
        Some("fr")
    );
}

#[tokio::test]
async fn test_fault_bodies_follow_debug_flag() {
    let (router, hits) = app(dispatcher(config(|_| {})));
    let response = send(&router, common::get("/faulty/fails")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "");

    let (debug_router, _) = app(dispatcher(config(|c| c.dispatch.debug = true)));
    let response = send(&debug_router, common::get("/faulty/fails")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "database unavailable");

    let response = send(&debug_router, common::get("/faulty/panics")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "action panicked: kaboom");

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fault_still_records_dispatch_info() {
    let (router, _) = app(dispatcher(config(|_| {})));
    let response = send(&router, common::get("/faulty/panics")).await;
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!(info.controller, "faulty");
    assert_eq!(info.action, "panics");
}

#[tokio::test]
async fn test_action_can_run_continuation() {
    let dispatcher = dispatcher(config(|c| {
        c.dispatch.calling_convention = CallingConvention::ContextThenPositional;
    }));
    let (router, hits) = app(dispatcher);

    let response = send(&router, common::get("/chain/pass")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-passed-by"], "chain.pass");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_positional_convention_withholds_request() {
    let (router, hits) = app(dispatcher(config(|c| c.dispatch.debug = true)));

    let response = send(&router, common::get("/chain/pass")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_string(response).await,
        "request and continuation not handed over"
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_underscored_method_naming() {
    let (router, hits) = app(dispatcher(config(|c| {
        c.dispatch.method_naming = MethodNaming::Underscored;
    })));

    let response = send(&router, common::get("/users/list")).await;
    assert_eq!(body_string(response).await, "get_list");

    let post = Request::builder()
        .method(Method::POST)
        .uri("/users/list")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, post).await;
    assert_eq!(body_string(response).await, "post_list");

    // No method-specific action: the plain name is used.
    let response = send(&router, common::get("/users/show/1")).await;
    assert_eq!(body_string(response).await, "show:1");

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri("/users/list")
        .body(Body::empty())
        .unwrap();
    let response = send(&router, delete).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_path_suffix() {
    let (router, hits) = app(dispatcher(config(|c| c.dispatch.path_suffix = ".html".into())));

    let response = send(&router, common::get("/users/show/7.html")).await;
    assert_eq!(body_string(response).await, "show:7");

    let response = send(&router, common::get("/.html")).await;
    assert_eq!(body_string(response).await, "home");

    // Without the suffix the last segment is taken verbatim.
    let response = send(&router, common::get("/users/show/7")).await;
    assert_eq!(body_string(response).await, "show:7");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_segment_fallback() {
    let (strict, hits) = app(dispatcher(config(|_| {})));
    let response = send(&strict, common::get("/about")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let (lenient, hits) = app(dispatcher(config(|c| c.dispatch.segment_fallback = true)));
    let response = send(&lenient, common::get("/about")).await;
    assert_eq!(body_string(response).await, "about:-");

    let response = send(&lenient, common::get("/users/7")).await;
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!((info.controller.as_str(), info.action.as_str()), ("users", "index"));

    // Both segments become params of the default action.
    let response = send(&lenient, common::get("/nope/nope")).await;
    assert_eq!(body_string(response).await, "home");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_injected_values_reach_actions() {
    let (router, _) = app(dispatcher(config(|c| {
        c.dispatch
            .injected
            .insert("site_name".into(), serde_json::json!("Example"));
    })));

    let response = send(&router, common::get("/main/site")).await;
    assert_eq!(body_string(response).await, "Example");
}

#[tokio::test]
async fn test_concurrent_requests_do_not_share_context() {
    let (router, hits) = app(dispatcher(config(with_languages)));
    let languages = ["en", "de", "fr"];

    let tasks: Vec<_> = (0..60)
        .map(|i| {
            let router = router.clone();
            let language = languages[i % languages.len()];
            tokio::spawn(async move {
                let path = format!("/{}/blog/post/{}", language, i);
                let response = router_send(router, &path).await;
                let expected = format!("{}|blog|post|{}", language, i);
                (body_string(response).await, expected)
            })
        })
        .collect();

    for task in tasks {
        let (body, expected) = task.await.unwrap();
        assert_eq!(body, expected);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

async fn router_send(router: Router, path: &str) -> axum::response::Response {
    send(&router, common::get(path)).await
}

#[tokio::test]
async fn test_delegate_runs_fixed_action() {
    let dispatcher = dispatcher(config(with_languages));
    let about = dispatcher.delegate("main", "about").unwrap();
    assert_eq!((about.controller(), about.action()), ("main", "about"));

    let router = Router::new().route("/about-us", get(about.into_handler()));

    let response = send(&router, with_cookie("/about-us", "lang=fr")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!(info.action, "about");
    assert_eq!(body_string(response).await, "about:fr");
}

#[tokio::test]
async fn test_delegate_continuation_is_terminal() {
    let dispatcher = dispatcher(config(|c| {
        c.dispatch.calling_convention = CallingConvention::ContextThenPositional;
    }));
    let pass = dispatcher.delegate("chain", "pass").unwrap();
    let router = Router::new().route("/pass", get(pass.into_handler()));

    let response = send(&router, common::get("/pass")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-passed-by"], "chain.pass");
}

#[tokio::test]
async fn test_delegate_requires_registered_action() {
    let dispatcher = dispatcher(config(|_| {}));

    assert_eq!(
        dispatcher.delegate("nope", "index").unwrap_err(),
        DispatchError::UnknownController("nope".into())
    );
    assert_eq!(
        dispatcher.delegate("main", "nope").unwrap_err(),
        DispatchError::UnknownAction {
            controller: "main".into(),
            action: "nope".into(),
        }
    );
}

#[tokio::test]
async fn test_delegate_contains_faults() {
    let dispatcher = dispatcher(config(|_| {}));
    let router = Router::new()
        .route("/fails", get(dispatcher.delegate("faulty", "fails").unwrap().into_handler()))
        .route("/panics", get(dispatcher.delegate("faulty", "panics").unwrap().into_handler()));

    for path in ["/fails", "/panics"] {
        let response = send(&router, common::get(path)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "");
    }

    let dispatcher = common::dispatcher(config(|c| c.dispatch.debug = true));
    let router = Router::new()
        .route("/fails", get(dispatcher.delegate("faulty", "fails").unwrap().into_handler()))
        .route("/panics", get(dispatcher.delegate("faulty", "panics").unwrap().into_handler()));

    let response = send(&router, common::get("/fails")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "database unavailable");

    let response = send(&router, common::get("/panics")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let info = response.extensions().get::<DispatchInfo>().cloned().unwrap();
    assert_eq!(info.action, "panics");
    assert_eq!(body_string(response).await, "action panicked: kaboom");
}

#[tokio::test]
async fn test_delegate_path_language_sets_cookie() {
    let dispatcher = dispatcher(config(with_languages));
    let router = Router::new()
        .route("/fr/about-us", get(dispatcher.delegate("main", "about").unwrap().into_handler()))
        .route("/fr/boom", get(dispatcher.delegate("faulty", "panics").unwrap().into_handler()));

    let response = send(&router, common::get("/fr/about-us")).await;
    assert_eq!(set_cookies(&response), vec!["lang=fr; Path=/".to_string()]);
    assert_eq!(
        response.extensions().get::<ResolvedLanguage>(),
        Some(&ResolvedLanguage {
            code: "fr".into(),
            source: LanguageSource::Path,
        })
    );
    assert_eq!(body_string(response).await, "about:fr");

    // A failing action still persists the language.
    let response = send(&router, common::get("/fr/boom")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(set_cookies(&response), vec!["lang=fr; Path=/".to_string()]);
    assert_eq!(body_string(response).await, "");

    // Already stored: nothing to rewrite.
    let response = send(&router, with_cookie("/fr/about-us", "lang=fr")).await;
    assert!(set_cookies(&response).is_empty());
}
