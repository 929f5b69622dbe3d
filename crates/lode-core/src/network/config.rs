use serde::{Deserialize, Serialize};

/// Representations requested from ontology servers, most preferred first.
pub const DEFAULT_CONTENT_TYPES: &[&str] = &[
    "application/rdf+xml",
    "text/turtle",
    "application/x-turtle",
    "text/xml",
    "text/plain",
    "*/*",
];

pub const DEFAULT_USER_AGENT: &str = "LODE extractor";

/// Content negotiation and transport settings for document retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Ordered list of MIME types to negotiate (first success wins)
    pub content_types: Vec<String>,
    /// Sent as `User-Agent` on every request
    pub user_agent: String,
    /// Redirects followed per content type before giving up on it
    pub max_redirects: u32,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Request timeout in seconds
    pub request_timeout_seconds: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            content_types: DEFAULT_CONTENT_TYPES.iter().map(ToString::to_string).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 3,
            connect_timeout_seconds: 30,
            request_timeout_seconds: 120,
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<(), FetchConfigError> {
        if self.content_types.is_empty() {
            return Err(FetchConfigError::NoContentTypes);
        }
        if let Some(bad) = self.content_types.iter().find(|t| t.trim().is_empty()) {
            return Err(FetchConfigError::InvalidContentType(bad.clone()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(FetchConfigError::EmptyUserAgent);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchConfigError {
    #[error("At least one content type must be configured")]
    NoContentTypes,
    #[error("Invalid content type: '{0}'")]
    InvalidContentType(String),
    #[error("User agent must not be empty")]
    EmptyUserAgent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefers_rdf_xml() {
        let config = FetchConfig::default();
        assert_eq!(config.content_types.first().map(String::as_str), Some("application/rdf+xml"));
        assert_eq!(config.content_types.last().map(String::as_str), Some("*/*"));
        assert_eq!(config.max_redirects, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let config = FetchConfig {
            content_types: vec![],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FetchConfigError::NoContentTypes)));

        let config = FetchConfig {
            content_types: vec!["text/turtle".into(), " ".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FetchConfigError::InvalidContentType(_))
        ));

        let config = FetchConfig {
            user_agent: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FetchConfigError::EmptyUserAgent)));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: FetchConfig = serde_json::from_str(r#"{"max_redirects": 7}"#).unwrap();
        assert_eq!(config.max_redirects, 7);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.content_types.len(), DEFAULT_CONTENT_TYPES.len());
    }
}
