use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::location::RequiredCategory;
use crate::network::{FetchConfig, DEFAULT_CONTENT_TYPES, DEFAULT_USER_AGENT};

pub const DEFAULT_LANGUAGES: &[&str] = &["en", "fr", "it"];

/// Deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodeConfig {
    /// Allow ontology definitions to be read from the local filesystem
    /// When false (default), only absolute web URLs are accepted
    pub allow_local_definitions: bool,
    /// Redirects followed per content type
    pub max_redirects: u32,
    pub user_agent: String,
    /// Negotiation order for ontology sources
    pub content_types: Vec<String>,
    /// Language codes offered to the renderer; the first is the default
    pub languages: Vec<String>,
    pub connect_timeout_seconds: u32,
    pub request_timeout_seconds: u32,
    /// Base URL of client-side resources such as stylesheets
    pub css_base: String,
    /// Additional stylesheet referenced by generated pages
    pub css_extra: String,
    /// Prefix joined with the ontology URL to link to its source
    pub source_base: String,
    /// Prefix joined with the ontology URL to link to its visualisation
    pub vis_base: String,
    pub home_url: String,
    /// JSON file selecting which inferences the reasoner materialises
    pub reasoner_options: Option<PathBuf>,
}

impl Default for LodeConfig {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            allow_local_definitions: false,
            max_redirects: fetch.max_redirects,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_types: DEFAULT_CONTENT_TYPES.iter().map(ToString::to_string).collect(),
            languages: DEFAULT_LANGUAGES.iter().map(ToString::to_string).collect(),
            connect_timeout_seconds: fetch.connect_timeout_seconds,
            request_timeout_seconds: fetch.request_timeout_seconds,
            css_base: "client/".to_string(),
            css_extra: String::new(),
            source_base: "source?url=".to_string(),
            vis_base: "extract?owlapi=true&url=".to_string(),
            home_url: "index.jsp".to_string(),
            reasoner_options: None,
        }
    }
}

impl LodeConfig {
    /// Defaults overlaid with `LODE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `LODE_*` key.
    ///
    /// Unparseable numbers are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("LODE_ALLOW_LOCAL_DEFINITIONS") {
            config.allow_local_definitions = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = parse_number(&lookup, "LODE_MAX_REDIRECTS") {
            config.max_redirects = v;
        }
        if let Some(v) = parse_number(&lookup, "LODE_CONNECT_TIMEOUT") {
            config.connect_timeout_seconds = v;
        }
        if let Some(v) = parse_number(&lookup, "LODE_REQUEST_TIMEOUT") {
            config.request_timeout_seconds = v;
        }
        if let Some(v) = lookup("LODE_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("LODE_CONTENT_TYPES") {
            config.content_types = split_list(&v);
        }
        if let Some(v) = lookup("LODE_LANGUAGES") {
            config.languages = split_list(&v);
        }
        if let Some(v) = lookup("LODE_CSS_BASE") {
            config.css_base = v;
        }
        if let Some(v) = lookup("LODE_CSS_EXTRA") {
            config.css_extra = v;
        }
        if let Some(v) = lookup("LODE_SOURCE_BASE").filter(|v| !v.is_empty()) {
            config.source_base = v;
        }
        if let Some(v) = lookup("LODE_VIS_BASE").filter(|v| !v.is_empty()) {
            config.vis_base = v;
        }
        if let Some(v) = lookup("LODE_HOME_URL").filter(|v| !v.is_empty()) {
            config.home_url = v;
        }
        if let Some(v) = lookup("LODE_REASONER_OPTIONS").filter(|v| !v.is_empty()) {
            config.reasoner_options = Some(PathBuf::from(v));
        }

        config
    }

    /// Category every ontology definition location must satisfy.
    #[must_use]
    pub const fn definition_category(&self) -> RequiredCategory {
        if self.allow_local_definitions {
            RequiredCategory::Any
        } else {
            RequiredCategory::WebAbsolute
        }
    }

    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            content_types: self.content_types.clone(),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
            connect_timeout_seconds: self.connect_timeout_seconds,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u32> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid number");
            None
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
