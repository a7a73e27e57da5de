//! HTTP method folding for action names.

use axum::http::Method;

use crate::config::MethodNaming;
use crate::registry::ControllerHandle;

/// Combine the lower-cased method with an action name, or `None` when the
/// strategy is disabled.
pub fn method_action_name(strategy: MethodNaming, method: &Method, action: &str) -> Option<String> {
    let method = method.as_str().to_lowercase();
    match strategy {
        MethodNaming::None => None,
        MethodNaming::CamelCase => Some(format!("{}{}", method, capitalize(action))),
        MethodNaming::Underscored => Some(format!("{}_{}", method, action)),
        MethodNaming::Joined => Some(format!("{}{}", method, action)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pick the action to run: the method-specific name when the controller
/// defines it, else the plain name, else `None`.
pub fn select_action(
    controller: &ControllerHandle,
    strategy: MethodNaming,
    method: &Method,
    action: &str,
) -> Option<String> {
    if let Some(name) = method_action_name(strategy, method, action) {
        if controller.has_action(&name) {
            return Some(name);
        }
    }
    if controller.has_action(action) {
        return Some(action.to_string());
    }
    None
}
