//! Parameters handed to the page renderer alongside a serialised ontology.

use serde::Serialize;

use crate::config::LodeConfig;
use crate::location::{validate, validate_path, RequiredCategory, ValidationError};

/// Validated presentation settings for one rendered ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationParams {
    pub ontology_url: String,
    pub source_url: String,
    pub lang: String,
    /// Always ends with `/`
    pub css_base: String,
    pub css_extra: String,
    pub vis_base: String,
    pub home_url: String,
}

impl PresentationParams {
    /// Validate request parameters against the deployment configuration.
    ///
    /// An empty `source_url` links to the source service for `ontology_url`. An
    /// empty `lang` selects the first configured language.
    pub fn resolve(
        config: &LodeConfig,
        ontology_url: &str,
        source_url: &str,
        lang: &str,
    ) -> Result<Self, ValidationError> {
        validate(
            ontology_url,
            RequiredCategory::WebAbsolute,
            false,
            "Invalid ontologyUrl Parameter",
        )?;

        let mut source = validate_path(
            source_url,
            RequiredCategory::WebAny,
            true,
            "Invalid sourceUrl Parameter",
        )?;
        if source.is_empty() {
            source = format!("{}{ontology_url}", config.source_base);
        }

        let mut css_base = config.css_base.clone();
        if !css_base.is_empty() && !css_base.ends_with('/') {
            css_base.push('/');
        }

        Ok(Self {
            ontology_url: ontology_url.to_string(),
            source_url: source,
            lang: select_language(&config.languages, lang)?,
            css_base: validate_path(&css_base, RequiredCategory::WebAny, false, "Invalid CSS base URL")?,
            css_extra: validate_path(
                &config.css_extra,
                RequiredCategory::WebAny,
                true,
                "Invalid extra CSS URL",
            )?,
            vis_base: validate_path(
                &config.vis_base,
                RequiredCategory::WebAny,
                true,
                "Invalid Visualise link base URL",
            )?,
            home_url: validate_path(
                &config.home_url,
                RequiredCategory::WebAny,
                true,
                "Invalid LODE Homepage URL",
            )?,
        })
    }

    /// Named parameters in the form transform stylesheets expect.
    pub fn pairs(&self) -> [(&'static str, &str); 7] {
        [
            ("css-location", self.css_base.as_str()),
            ("css-extra", self.css_extra.as_str()),
            ("lang", self.lang.as_str()),
            ("lode-home", self.home_url.as_str()),
            ("ontology-url", self.ontology_url.as_str()),
            ("source", self.source_url.as_str()),
            ("vis-base", self.vis_base.as_str()),
        ]
    }
}

fn select_language(supported: &[String], lang: &str) -> Result<String, ValidationError> {
    if lang.is_empty() {
        return supported
            .first()
            .cloned()
            .ok_or_else(|| unsupported(supported, lang));
    }

    supported
        .iter()
        .find(|ok| ok.eq_ignore_ascii_case(lang))
        .cloned()
        .ok_or_else(|| unsupported(supported, lang))
}

fn unsupported(supported: &[String], lang: &str) -> ValidationError {
    ValidationError::UnsupportedLanguage {
        lang: lang.to_string(),
        supported: supported.join(", "),
    }
}

/// The external page renderer.
pub trait Renderer {
    /// Produce the final document for `serialized` using `params`.
    fn render(&self, serialized: &str, params: &PresentationParams) -> crate::Result<String>;
}
