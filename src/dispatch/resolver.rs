//! Controller/action resolution.
//!
//! # Responsibilities
//! - Turn method + path (+ stored language) into a dispatch decision
//! - Apply defaults for missing controller/action segments
//! - Apply method-based action naming
//! - Optionally re-read unknown segments against the defaults
//!
//! # Design Decisions
//! - Pure function of config, registry and request data; no side effects
//! - A miss is an ordinary outcome, not an error

use std::collections::VecDeque;
use std::sync::Arc;

use axum::http::Method;

use crate::config::AppConfig;
use crate::dispatch::language::{resolve_language, ResolvedLanguage};
use crate::dispatch::naming::select_action;
use crate::dispatch::segments::segment_path;
use crate::registry::{ControllerHandle, ControllerRegistry};

/// Full decision for one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// `None` when i18n is disabled.
    pub language: Option<ResolvedLanguage>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Found(Resolved),
    Missed(Miss),
}

/// A controller action ready to be invoked.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub controller: Arc<ControllerHandle>,
    /// Action name as registered on the controller (after method naming).
    pub action: String,
    /// Positional parameters, in path order.
    pub params: Vec<String>,
}

/// Why resolution passed the request on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Miss {
    Controller(String),
    Action { controller: String, action: String },
}

impl Miss {
    pub fn reason(&self) -> &'static str {
        match self {
            Miss::Controller(_) => "unknown_controller",
            Miss::Action { .. } => "unknown_action",
        }
    }
}

impl Resolution {
    pub fn found(&self) -> Option<&Resolved> {
        match &self.outcome {
            Outcome::Found(resolved) => Some(resolved),
            Outcome::Missed(_) => None,
        }
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.code.as_str())
    }
}

/// Resolve a request path against the registry.
pub fn resolve(
    config: &AppConfig,
    registry: &ControllerRegistry,
    method: &Method,
    path: &str,
    stored_language: Option<&str>,
) -> Resolution {
    let dispatch = &config.dispatch;
    let mut segments: VecDeque<String> = segment_path(path, &dispatch.path_suffix).into();
    let language = resolve_language(&config.i18n, &mut segments, stored_language);

    let (mut controller_name, controller_from_path) = take_or(&mut segments, &dispatch.default_controller);
    if !registry.contains(&controller_name) && dispatch.segment_fallback && controller_from_path {
        segments.push_front(controller_name);
        controller_name = dispatch.default_controller.clone();
    }

    let controller = match registry.get(&controller_name) {
        Some(controller) => controller.clone(),
        None => {
            return Resolution {
                language,
                outcome: Outcome::Missed(Miss::Controller(controller_name)),
            };
        }
    };

    let (mut action_name, action_from_path) = take_or(&mut segments, &dispatch.default_action);
    let mut selected = select_action(&controller, dispatch.method_naming, method, &action_name);
    if selected.is_none() && dispatch.segment_fallback && action_from_path {
        segments.push_front(action_name);
        action_name = dispatch.default_action.clone();
        selected = select_action(&controller, dispatch.method_naming, method, &action_name);
    }

    let outcome = match selected {
        Some(action) => Outcome::Found(Resolved {
            controller,
            action,
            params: segments.into(),
        }),
        None => Outcome::Missed(Miss::Action {
            controller: controller_name,
            action: action_name,
        }),
    };

    Resolution { language, outcome }
}

/// Pop the next segment, or fall back to `default`. The flag tells whether
/// the value came from the path.
fn take_or(segments: &mut VecDeque<String>, default: &str) -> (String, bool) {
    match segments.pop_front() {
        Some(segment) => (segment, true),
        None => (default.to_string(), false),
    }
}
