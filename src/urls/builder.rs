//! URL generation, the inverse of dispatch.
//!
//! # Layout
//! ```text
//! base + "/" + [language "/"] + controller + ["/" action] + ["/" params] + [suffix]
//! ```
//!
//! A URL whose rendering equals the rendering of the site root (default
//! controller with the default or an empty action, no params) collapses to
//! `base + "/" + language`. The comparison is between rendered strings.

use std::sync::Arc;

use crate::config::AppConfig;

/// Positional parameters of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlParams {
    /// One path segment per element; each is percent-encoded.
    ///
    /// A trailing empty segment renders as a trailing `/`, which dispatch
    /// strips, so it does not come back as a param.
    Segments(Vec<String>),
    /// A ready-made `a/b/c` string; leading and trailing slashes are dropped
    /// and each piece is percent-encoded.
    Raw(String),
}

impl Default for UrlParams {
    fn default() -> Self {
        UrlParams::Segments(Vec::new())
    }
}

impl UrlParams {
    /// Render as `/a/b`, or an empty string when there are no params.
    fn render(&self) -> String {
        let pieces: Vec<String> = match self {
            UrlParams::Segments(segments) => segments.iter().map(|s| encode(s)).collect(),
            UrlParams::Raw(raw) => {
                let trimmed = raw.trim_matches('/');
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    trimmed.split('/').map(encode).collect()
                }
            }
        };
        if pieces.is_empty() {
            String::new()
        } else {
            format!("/{}", pieces.join("/"))
        }
    }
}

impl From<Vec<String>> for UrlParams {
    fn from(segments: Vec<String>) -> Self {
        UrlParams::Segments(segments)
    }
}

impl From<Vec<&str>> for UrlParams {
    fn from(segments: Vec<&str>) -> Self {
        UrlParams::Segments(segments.into_iter().map(str::to_string).collect())
    }
}

impl From<&str> for UrlParams {
    fn from(raw: &str) -> Self {
        UrlParams::Raw(raw.to_string())
    }
}

impl From<String> for UrlParams {
    fn from(raw: String) -> Self {
        UrlParams::Raw(raw)
    }
}

/// Symbolic description of a URL. Unset fields take the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSpec {
    pub base: Option<String>,
    pub language: Option<String>,
    pub controller: Option<String>,
    /// `Some("")` renders no action segment.
    pub action: Option<String>,
    pub params: UrlParams,
    /// Append the configured suffix. Defaults to true.
    pub suffix: Option<bool>,
}

impl UrlSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn params(mut self, params: impl Into<UrlParams>) -> Self {
        self.params = params.into();
        self
    }

    /// Append one positional parameter.
    pub fn param(mut self, param: impl Into<String>) -> Self {
        let param = param.into();
        match &mut self.params {
            UrlParams::Segments(segments) => segments.push(param),
            UrlParams::Raw(raw) => {
                let mut joined = raw.trim_end_matches('/').to_string();
                joined.push('/');
                joined.push_str(&param);
                *raw = joined;
            }
        }
        self
    }

    pub fn suffix(mut self, suffix: bool) -> Self {
        self.suffix = Some(suffix);
        self
    }
}

/// Renders [`UrlSpec`]s against the configuration.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    config: Arc<AppConfig>,
}

impl UrlBuilder {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    pub fn build(&self, spec: &UrlSpec) -> String {
        let dispatch = &self.config.dispatch;
        let i18n = &self.config.i18n;

        let base = spec.base.as_deref().unwrap_or(&self.config.urls.base);
        let base = base.strip_suffix('/').unwrap_or(base);
        let language = if i18n.enabled {
            spec.language.as_deref().unwrap_or(&i18n.default_language)
        } else {
            ""
        };
        let controller = spec.controller.as_deref().unwrap_or(&dispatch.default_controller);
        let params = spec.params.render();
        // Params in the action slot would be read back as the action name.
        let action = match spec.action.as_deref() {
            Some("") if !params.is_empty() => dispatch.default_action.as_str(),
            Some(action) => action,
            None => dispatch.default_action.as_str(),
        };
        let suffix = if spec.suffix.unwrap_or(true) {
            dispatch.path_suffix.as_str()
        } else {
            ""
        };

        let url = render(base, language, controller, action, &params, suffix);

        let root = render(
            base,
            language,
            &dispatch.default_controller,
            &dispatch.default_action,
            "",
            suffix,
        );
        let bare_root = render(base, language, &dispatch.default_controller, "", "", suffix);
        if url == root || url == bare_root {
            return format!("{}/{}", base, encode(language));
        }

        url
    }
}

fn render(
    base: &str,
    language: &str,
    controller: &str,
    action: &str,
    params: &str,
    suffix: &str,
) -> String {
    let mut url = String::with_capacity(base.len() + controller.len() + action.len() + params.len() + 8);
    url.push_str(base);
    url.push('/');
    if !language.is_empty() {
        url.push_str(&encode(language));
        url.push('/');
    }
    url.push_str(&encode(controller));
    if !action.is_empty() {
        url.push('/');
        url.push_str(&encode(action));
    }
    url.push_str(params);
    url.push_str(suffix);
    url
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
