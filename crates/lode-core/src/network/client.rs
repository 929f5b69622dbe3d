use std::time::Duration;

use reqwest::header::{ACCEPT, LOCATION, USER_AGENT};
use reqwest::{redirect, Client, StatusCode};
use url::Url;

use super::config::{FetchConfig, FetchConfigError};
use crate::location::Location;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid fetch configuration: {0}")]
    Config(#[from] FetchConfigError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Why one content type (or a local read) did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// `None` for filesystem reads and locations that were never negotiated
    pub content_type: Option<String>,
    pub message: String,
}

/// Every attempt failed. Diagnostics are in the order the attempts were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub diagnostics: Vec<Diagnostic>,
}

impl FetchFailure {
    fn single(message: String) -> Self {
        Self {
            diagnostics: vec![Diagnostic {
                content_type: None,
                message,
            }],
        }
    }

    pub fn for_content_type(&self, content_type: &str) -> Option<&Diagnostic> {
        self.diagnostics
            .iter()
            .find(|d| d.content_type.as_deref() == Some(content_type))
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("The source can't be downloaded in any permitted format.")?;
        for diagnostic in &self.diagnostics {
            write!(f, "\n{}", diagnostic.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FetchFailure {}

/// A retrieved document and the content type that was accepted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// `None` for filesystem reads
    pub content_type: Option<String>,
    pub body: String,
}

pub type FetchOutcome = Result<Fetched, FetchFailure>;

/// HTTP/file retriever that negotiates content types in strict preference order
///
/// Redirects are followed by hand so that each content type gets its own budget;
/// the underlying client never follows them.
#[derive(Clone)]
pub struct ContentFetcher {
    config: FetchConfig,
    inner: Client,
}

impl ContentFetcher {
    pub fn new(config: FetchConfig) -> ClientResult<Self> {
        config.validate()?;
        let inner = build_client(&config)?;
        Ok(Self { config, inner })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch with the configured content type list.
    pub async fn fetch(&self, location: &Location) -> FetchOutcome {
        self.fetch_as(location, &self.config.content_types).await
    }

    /// Fetch, negotiating `content_types` in order. The first 200 response wins.
    pub async fn fetch_as<S: AsRef<str>>(
        &self,
        location: &Location,
        content_types: &[S],
    ) -> FetchOutcome {
        if location.is_filesystem() {
            return read_local(location).await;
        }

        let Some(start) = location.url() else {
            return Err(FetchFailure::single(format!(
                "URI '{location}' is not absolute and cannot be downloaded."
            )));
        };

        let mut diagnostics = Vec::with_capacity(content_types.len());
        for content_type in content_types {
            let content_type = content_type.as_ref();
            match self.negotiate(start, content_type).await {
                Ok(body) => {
                    tracing::debug!(url = %start, content_type, "Fetched document");
                    return Ok(Fetched {
                        content_type: Some(content_type.to_string()),
                        body,
                    });
                }
                Err(message) => {
                    tracing::debug!(url = %start, content_type, %message, "Content type rejected");
                    diagnostics.push(Diagnostic {
                        content_type: Some(content_type.to_string()),
                        message,
                    });
                }
            }
        }

        Err(FetchFailure { diagnostics })
    }

    /// One negotiation sequence for a single content type, starting from `start`
    /// with a fresh redirect budget.
    async fn negotiate(&self, start: &Url, content_type: &str) -> Result<String, String> {
        let max_redirects = self.config.max_redirects;

        let mut url = start.clone();
        let mut redirects = 0;

        loop {
            tracing::trace!(%url, content_type, redirects, "GET");
            let response = self
                .inner
                .get(url.clone())
                .header(ACCEPT, content_type)
                .header(USER_AGENT, self.config.user_agent.as_str())
                .send()
                .await
                .map_err(|e| transport_error(content_type, e))?;

            let status = response.status();
            if status == StatusCode::OK {
                let text = response.text().await.map_err(|e| transport_error(content_type, e))?;
                return Ok(normalize_lines(&text));
            }

            if !is_followed_redirect(status) {
                return Err(format!(
                    "MIME type '{content_type}': Received HTTP Response code {} for URL '{url}' at redirect {redirects}.",
                    status.as_u16()
                ));
            }

            if redirects >= max_redirects {
                return Err(format!(
                    "MIME type '{content_type}': Too many redirects! Reached limit of {max_redirects} with url '{url}'."
                ));
            }

            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    transport_error(
                        content_type,
                        format!("Redirect from '{url}' has no Location header"),
                    )
                })?;
            url = url.join(target).map_err(|e| transport_error(content_type, e))?;
            redirects += 1;
        }
    }
}

fn build_client(config: &FetchConfig) -> ClientResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
        .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
        .redirect(redirect::Policy::none())
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(ClientError::Http)
}

fn transport_error(content_type: &str, e: impl std::fmt::Display) -> String {
    format!("MIME type '{content_type}': # {e}")
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301..=303)
}

async fn read_local(location: &Location) -> FetchOutcome {
    let Some(path) = location.to_file_path() else {
        return Err(FetchFailure::single(format!(
            "'{location}' does not name a local file."
        )));
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(text) => {
            tracing::debug!(path = %path.display(), "Read local document");
            Ok(Fetched {
                content_type: None,
                body: normalize_lines(&text),
            })
        }
        Err(e) => Err(FetchFailure::single(format!("{}: {e}", path.display()))),
    }
}

/// Terminate every line, including the last, with a single `\n`.
fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}
