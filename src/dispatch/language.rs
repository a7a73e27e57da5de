//! Language prefix detection.
//!
//! # Priority
//! 1. Leading path segment, if it is a supported language (consumed)
//! 2. Stored preference cookie, if still supported
//! 3. Configured default language
//!
//! A leading segment that is not a supported language is left in place and
//! becomes the controller candidate.

use std::collections::VecDeque;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use cookie::Cookie;

use crate::config::I18nConfig;

/// Where the resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Path,
    Cookie,
    Default,
}

/// Language resolved for one request.
///
/// Inserted into both the request and the response extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    pub code: String,
    pub source: LanguageSource,
}

/// Resolve the request language, consuming a leading language segment.
///
/// Returns `None` when i18n is disabled.
pub fn resolve_language(
    i18n: &I18nConfig,
    segments: &mut VecDeque<String>,
    stored: Option<&str>,
) -> Option<ResolvedLanguage> {
    if !i18n.enabled {
        return None;
    }

    if let Some(first) = segments.front() {
        if i18n.supports(first) {
            let code = segments.pop_front()?;
            return Some(ResolvedLanguage {
                code,
                source: LanguageSource::Path,
            });
        }
    }

    if let Some(code) = stored.filter(|code| i18n.supports(code)) {
        return Some(ResolvedLanguage {
            code: code.to_string(),
            source: LanguageSource::Cookie,
        });
    }

    Some(ResolvedLanguage {
        code: i18n.default_language.clone(),
        source: LanguageSource::Default,
    })
}

/// Read the stored language preference from the `Cookie` headers.
pub fn stored_language(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Append a `Set-Cookie` header remembering `code`.
pub fn persist_language(headers: &mut HeaderMap, cookie_name: &str, code: &str) {
    let cookie = Cookie::build((cookie_name.to_string(), code.to_string()))
        .path("/")
        .build();
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => {
            tracing::warn!(language = %code, error = %e, "Language cookie not representable as header");
        }
    }
}
