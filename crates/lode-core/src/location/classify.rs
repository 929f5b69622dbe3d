use std::path::{PathBuf, MAIN_SEPARATOR};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const FILE_SCHEME: &str = "file";
const DEFAULT_CONTEXT: &str = "Invalid URI path";

/// Relative references have no base of their own; syntax is checked against this one.
static RELATIVE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://relative.invalid/").expect("static base URL"));

static DRIVE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]:/.+").expect("static drive path pattern"));

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{context}. Null or empty values are not permitted.")]
    Empty { context: String },
    #[error("{context}. Not a valid URI.")]
    Malformed {
        context: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{context} '{raw}'. Only local filesystem paths are permitted.")]
    NotFilesystem { context: String, raw: String },
    #[error("{context} '{raw}'. Local filesystem paths are not permitted.")]
    FilesystemForbidden { context: String, raw: String },
    #[error("{context} '{raw}'. Only absolute/remote Web URLs are permitted.")]
    NotWebAbsolute { context: String, raw: String },
    #[error("{context} '{entry}'. Expected '<url>=<location>'.")]
    MalformedMapping { context: String, entry: String },
    #[error("Invalid lang parameter '{lang}'. Supported language codes are {supported}")]
    UnsupportedLanguage { lang: String, supported: String },
}

/// Where a location points once normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Filesystem,
    Web,
}

/// The category a caller demands from a location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredCategory {
    Any,
    Filesystem,
    WebAny,
    #[default]
    WebAbsolute,
}

impl RequiredCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Filesystem => "filesystem",
            Self::WebAny => "web-any",
            Self::WebAbsolute => "web-absolute",
        }
    }

    /// Whether a bare `/path` should be read as a local file rather than a web-relative path.
    ///
    /// Only categories that already admit local files get this treatment, so a web-only
    /// deployment never turns a leading slash into a disk read. `Any` is included: a
    /// deployment that allows local definitions reads `/srv/onto.owl` from disk rather
    /// than as a path on some unknown web host.
    #[must_use]
    pub const fn defaults_to_filesystem(&self) -> bool {
        matches!(self, Self::Any | Self::Filesystem)
    }
}

impl std::fmt::Display for RequiredCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequiredCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "filesystem" => Ok(Self::Filesystem),
            "web-any" => Ok(Self::WebAny),
            "web-absolute" => Ok(Self::WebAbsolute),
            _ => Err(format!(
                "unknown location category '{s}' (expected any, filesystem, web-any or web-absolute)"
            )),
        }
    }
}

/// A classified, normalised reference to a document on disk or on the web.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    category: Category,
    is_absolute: bool,
    raw: String,
    normalized: String,
    #[serde(skip)]
    url: Option<Url>,
}

impl Location {
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        self.is_absolute
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The parsed URL, absent for relative references.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    #[must_use]
    pub const fn is_filesystem(&self) -> bool {
        matches!(self.category, Category::Filesystem)
    }

    /// Local path for filesystem locations.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if !self.is_filesystem() {
            return None;
        }
        self.url.as_ref().and_then(|url| url.to_file_path().ok())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Classify `raw` using the host platform's path separator.
pub fn classify(raw: &str, default_is_filesystem: bool) -> Result<Location, url::ParseError> {
    classify_with_separator(raw, MAIN_SEPARATOR, default_is_filesystem)
}

pub(crate) fn classify_with_separator(
    raw: &str,
    separator: char,
    default_is_filesystem: bool,
) -> Result<Location, url::ParseError> {
    let normalized = normalize(raw, separator, default_is_filesystem);
    let url = match Url::parse(&normalized) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            RELATIVE_BASE.join(&normalized)?;
            None
        }
        Err(e) => return Err(e),
    };
    Ok(build(raw.to_string(), normalized, url))
}

fn build(raw: String, normalized: String, url: Option<Url>) -> Location {
    let category = match &url {
        Some(url) if url.scheme() == FILE_SCHEME => Category::Filesystem,
        _ => Category::Web,
    };
    let is_absolute = match category {
        Category::Filesystem => true,
        Category::Web => url
            .as_ref()
            .and_then(Url::host_str)
            .is_some_and(|host| !host.is_empty()),
    };
    Location {
        category,
        is_absolute,
        raw,
        normalized,
        url,
    }
}

fn normalize(raw: &str, separator: char, default_is_filesystem: bool) -> String {
    let encoded = encode_whitespace(raw);

    if separator != '/' {
        let slashed = encoded.replace(separator, "/");
        if DRIVE_PATH.is_match(&slashed) {
            return format!("file:///{slashed}");
        }
        return match slashed.strip_prefix("//") {
            Some(share) if !share.is_empty() => format!("file://{share}"),
            _ => slashed,
        };
    }

    if default_is_filesystem && raw.len() > 1 && raw.starts_with('/') {
        format!("file://{encoded}")
    } else {
        encoded
    }
}

fn encode_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

/// Classify `raw` and enforce `required`.
///
/// Returns `Ok(None)` for empty input when `allow_empty` is set. `context` prefixes every
/// error message; an empty context falls back to a generic one.
pub fn validate(
    raw: &str,
    required: RequiredCategory,
    allow_empty: bool,
    context: &str,
) -> Result<Option<Location>, ValidationError> {
    let context = if context.is_empty() {
        DEFAULT_CONTEXT
    } else {
        context
    };

    if raw.is_empty() {
        if allow_empty {
            return Ok(None);
        }
        return Err(ValidationError::Empty {
            context: context.to_string(),
        });
    }

    let location = classify(raw, required.defaults_to_filesystem()).map_err(|source| {
        ValidationError::Malformed {
            context: context.to_string(),
            source,
        }
    })?;

    check_category(&location, required, context)?;
    Ok(Some(location))
}

/// Like [`validate`] but rejects empty input outright.
pub fn validate_required(
    raw: &str,
    required: RequiredCategory,
    context: &str,
) -> Result<Location, ValidationError> {
    validate(raw, required, false, context)?.ok_or_else(|| ValidationError::Empty {
        context: context.to_string(),
    })
}

/// Normalised text of a validated location, empty when absent.
pub fn validate_path(
    raw: &str,
    required: RequiredCategory,
    allow_empty: bool,
    context: &str,
) -> Result<String, ValidationError> {
    Ok(validate(raw, required, allow_empty, context)?
        .map(|location| location.normalized)
        .unwrap_or_default())
}

/// Enforce `required` on an already classified location.
pub(crate) fn check_category(
    location: &Location,
    required: RequiredCategory,
    context: &str,
) -> Result<(), ValidationError> {
    let raw = || location.raw.clone();
    match required {
        RequiredCategory::Filesystem if !location.is_filesystem() => {
            Err(ValidationError::NotFilesystem {
                context: context.to_string(),
                raw: raw(),
            })
        }
        RequiredCategory::WebAny if location.is_filesystem() => {
            Err(ValidationError::FilesystemForbidden {
                context: context.to_string(),
                raw: raw(),
            })
        }
        RequiredCategory::WebAbsolute
            if location.is_filesystem() || !location.is_absolute || location.url.is_none() =>
        {
            Err(ValidationError::NotWebAbsolute {
                context: context.to_string(),
                raw: raw(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_posix_path_is_filesystem_when_defaulted() {
        let loc = classify_with_separator("/srv/onto.owl", '/', true).unwrap();
        assert_eq!(loc.category(), Category::Filesystem);
        assert_eq!(loc.normalized(), "file:///srv/onto.owl");
        assert!(loc.is_absolute());
        assert_eq!(loc.to_file_path(), Some(PathBuf::from("/srv/onto.owl")));
    }

    #[test]
    fn test_absolute_posix_path_is_web_relative_without_default() {
        let loc = classify_with_separator("/srv/onto.owl", '/', false).unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert!(!loc.is_absolute());
        assert!(loc.url().is_none());
    }

    #[test]
    fn test_lone_slash_is_not_a_file_path() {
        let loc = classify_with_separator("/", '/', true).unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert_eq!(loc.normalized(), "/");
    }

    #[test]
    fn test_whitespace_is_percent_encoded() {
        let loc = classify_with_separator("/my docs/onto\tv1.owl", '/', true).unwrap();
        assert_eq!(loc.normalized(), "file:///my%20docs/onto%20v1.owl");
        assert_eq!(
            loc.to_file_path(),
            Some(PathBuf::from("/my docs/onto v1.owl"))
        );
    }

    #[test]
    fn test_web_url_is_absolute() {
        let loc = classify_with_separator("http://purl.org/spar/fabio", '/', false).unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert!(loc.is_absolute());
        assert_eq!(loc.raw(), "http://purl.org/spar/fabio");
    }

    #[test]
    fn test_bare_address_is_web_relative() {
        let loc = classify_with_separator("purl.org/spar/fabio", '/', true).unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert!(!loc.is_absolute());
    }

    #[test]
    fn test_scheme_without_host_is_not_absolute() {
        let loc = classify_with_separator("urn:isbn:0451450523", '/', false).unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert!(!loc.is_absolute());
    }

    #[test]
    fn test_file_scheme_is_case_insensitive() {
        let loc = classify_with_separator("FILE:///etc/passwd", '/', false).unwrap();
        assert_eq!(loc.category(), Category::Filesystem);
    }

    #[test]
    fn test_windows_drive_path() {
        let loc = classify_with_separator(r"C:\ontologies\fabio.owl", '\\', false).unwrap();
        assert_eq!(loc.category(), Category::Filesystem);
        assert_eq!(loc.normalized(), "file:///C:/ontologies/fabio.owl");
    }

    #[test]
    fn test_windows_unc_path() {
        let loc = classify_with_separator(r"\\fileserver\share\fabio.owl", '\\', false).unwrap();
        assert_eq!(loc.category(), Category::Filesystem);
        assert_eq!(loc.normalized(), "file://fileserver/share/fabio.owl");
        assert_eq!(loc.url().and_then(Url::host_str), Some("fileserver"));
    }

    #[test]
    fn test_windows_lowercase_drive_is_not_rewritten() {
        let loc = classify_with_separator(r"c:\onto.owl", '\\', false).unwrap();
        assert_eq!(loc.normalized(), "c:/onto.owl");
        assert_eq!(loc.category(), Category::Web);
    }

    #[test]
    fn test_validate_empty() {
        assert!(validate("", RequiredCategory::Any, true, "ctx").unwrap().is_none());

        let err = validate("", RequiredCategory::Any, false, "Invalid Ontology").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid Ontology. Null or empty values are not permitted."
        );
    }

    #[test]
    fn test_validate_default_context() {
        let err = validate("", RequiredCategory::Any, false, "").unwrap_err();
        assert!(err.to_string().starts_with("Invalid URI path."));
    }

    #[test]
    fn test_web_any_rejects_file_scheme() {
        for raw in ["file:///etc/passwd", "FILE:///etc/shadow", "file://host/share/x"] {
            let err = validate(raw, RequiredCategory::WebAny, false, "ctx").unwrap_err();
            assert!(matches!(err, ValidationError::FilesystemForbidden { .. }), "{raw}");
        }
    }

    #[test]
    fn test_web_any_keeps_leading_slash_on_the_web() {
        let loc = validate("/etc/passwd", RequiredCategory::WebAny, false, "ctx")
            .unwrap()
            .unwrap();
        assert_eq!(loc.category(), Category::Web);
        assert!(loc.to_file_path().is_none());
    }

    #[test]
    fn test_web_absolute_rejections() {
        for raw in [
            "file:///etc/passwd",
            "/etc/passwd",
            "relative/onto.owl",
            "mailto:someone@example.org",
        ] {
            let err = validate(raw, RequiredCategory::WebAbsolute, false, "ctx").unwrap_err();
            assert!(matches!(err, ValidationError::NotWebAbsolute { .. }), "{raw}");
        }
    }

    #[test]
    fn test_web_absolute_accepts_remote_url() {
        let loc = validate(
            "https://w3id.org/example#",
            RequiredCategory::WebAbsolute,
            false,
            "ctx",
        )
        .unwrap()
        .unwrap();
        assert!(loc.is_absolute());
    }

    #[test]
    fn test_filesystem_requires_file_scheme() {
        let err = validate("http://example.org/x", RequiredCategory::Filesystem, false, "Bad")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad 'http://example.org/x'. Only local filesystem paths are permitted."
        );

        let loc = validate("/tmp/x.owl", RequiredCategory::Filesystem, false, "Bad")
            .unwrap()
            .unwrap();
        assert!(loc.is_filesystem());
    }

    #[test]
    fn test_any_allows_everything() {
        assert!(validate("/tmp/x.owl", RequiredCategory::Any, false, "c").is_ok());
        assert!(validate("http://example.org", RequiredCategory::Any, false, "c").is_ok());
        assert!(validate("relative", RequiredCategory::Any, false, "c").is_ok());
    }

    #[test]
    fn test_malformed_uri() {
        let err = validate("http://exa mple[.org", RequiredCategory::Any, false, "ctx")
            .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));
    }

    #[test]
    fn test_validate_path_returns_text() {
        assert_eq!(
            validate_path("", RequiredCategory::WebAny, true, "c").unwrap(),
            ""
        );
        assert_eq!(
            validate_path("http://example.org/a b", RequiredCategory::WebAny, true, "c").unwrap(),
            "http://example.org/a%20b"
        );
    }

    #[test]
    fn test_required_category_parse() {
        assert_eq!("web-any".parse::<RequiredCategory>(), Ok(RequiredCategory::WebAny));
        assert_eq!(RequiredCategory::default(), RequiredCategory::WebAbsolute);
        assert!("local".parse::<RequiredCategory>().is_err());
    }
}
