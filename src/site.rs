//! Controllers served by the binary.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use controller_dispatch::{ActionError, ControllerHandle, Invocation, UrlSpec};

#[derive(Debug, Clone, Serialize)]
struct User {
    id: u32,
    name: &'static str,
}

const USERS: &[User] = &[
    User { id: 1, name: "Ada" },
    User { id: 2, name: "Grace" },
    User { id: 3, name: "Linus" },
];

/// Every controller the binary knows about, enabled by unit files in the
/// controller directory.
pub fn controllers() -> Vec<ControllerHandle> {
    vec![main_controller(), users_controller(), status_controller()]
}

fn main_controller() -> ControllerHandle {
    ControllerHandle::builder("main")
        .action("index", home)
        .action("about", about)
        .build()
}

fn users_controller() -> ControllerHandle {
    ControllerHandle::builder("users")
        .action("index", list_users)
        .action("show", show_user)
        .action("edit", edit_user)
        .action("post_edit", save_user)
        .build()
}

fn status_controller() -> ControllerHandle {
    ControllerHandle::builder("status")
        .action("index", status)
        .action("fail", fail)
        .build()
}

async fn home(inv: Invocation) -> Result<Html<String>, ActionError> {
    let ctx = &inv.context;
    let site = ctx
        .injected("site_name")
        .and_then(|v| v.as_str())
        .unwrap_or("controller-dispatch");
    let users = ctx.url_for(UrlSpec::new().controller("users"));
    let about = ctx.url_for(UrlSpec::new().action("about"));
    Ok(Html(format!(
        "<h1>{}</h1><ul><li><a href=\"{}\">Users</a></li><li><a href=\"{}\">About</a></li></ul>",
        site, users, about
    )))
}

async fn about(inv: Invocation) -> Result<String, ActionError> {
    Ok(format!(
        "about ({})",
        inv.context.language.as_deref().unwrap_or("-")
    ))
}

async fn list_users(_inv: Invocation) -> Result<Json<&'static [User]>, ActionError> {
    Ok(Json(USERS))
}

fn find_user(inv: &Invocation) -> Option<&'static User> {
    let id: u32 = inv.param(0)?.parse().ok()?;
    USERS.iter().find(|u| u.id == id)
}

async fn show_user(inv: Invocation) -> Result<Response, ActionError> {
    Ok(match find_user(&inv) {
        Some(user) => Json(user).into_response(),
        None => (StatusCode::NOT_FOUND, "no such user").into_response(),
    })
}

async fn edit_user(inv: Invocation) -> Result<Response, ActionError> {
    Ok(match find_user(&inv) {
        Some(user) => {
            let action = inv.context.url_for(
                UrlSpec::new()
                    .controller("users")
                    .action("edit")
                    .param(user.id.to_string()),
            );
            Html(format!(
                "<form method=\"post\" action=\"{}\"><input name=\"name\" value=\"{}\"></form>",
                action, user.name
            ))
            .into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such user").into_response(),
    })
}

async fn save_user(inv: Invocation) -> Result<Response, ActionError> {
    match find_user(&inv) {
        Some(user) => Ok((StatusCode::ACCEPTED, format!("saved {}", user.id)).into_response()),
        None => Err(ActionError::msg(format!(
            "cannot save unknown user {:?}",
            inv.param(0)
        ))),
    }
}

async fn status(inv: Invocation) -> Result<Json<serde_json::Value>, ActionError> {
    let ctx = &inv.context;
    Ok(Json(serde_json::json!({
        "controller": ctx.controller,
        "action": ctx.action,
        "language": ctx.language,
        "params": inv.params,
        "injected": &**ctx.injected_values(),
    })))
}

async fn fail(_inv: Invocation) -> Result<&'static str, ActionError> {
    Err(ActionError::msg("deliberate failure"))
}
