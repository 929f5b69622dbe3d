use std::collections::BTreeMap;

use url::Url;

use super::classify::{validate_required, Location, RequiredCategory, ValidationError};

const ORIGINAL_CONTEXT: &str = "Invalid Import URL to be Mapped";

/// Alternate locations for imported ontologies, keyed by the import's absolute web URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    entries: BTreeMap<Url, Location>,
}

impl ImportMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `url_1=location_1|url_2=location_2`; entries may also be newline separated.
    ///
    /// Keys must be absolute web URLs. Values must satisfy `category`, which is the
    /// deployment's definition category.
    pub fn parse(text: &str, category: RequiredCategory) -> Result<Self, ValidationError> {
        let mut map = Self::new();

        for entry in text.split(['|', '\n']).map(str::trim) {
            if entry.is_empty() {
                continue;
            }

            let (original, replacement) =
                entry
                    .split_once('=')
                    .ok_or_else(|| ValidationError::MalformedMapping {
                        context: ORIGINAL_CONTEXT.to_string(),
                        entry: entry.to_string(),
                    })?;

            let original = validate_required(original, RequiredCategory::WebAbsolute, ORIGINAL_CONTEXT)?;
            let context = format!("Invalid URI to be mapped to '{original}'");
            let replacement = validate_required(replacement, category, &context)?;

            if let Some(url) = original.url() {
                map.insert(url.clone(), replacement);
            }
        }

        Ok(map)
    }

    pub(crate) fn insert(&mut self, original: Url, replacement: Location) {
        self.entries.insert(original, replacement);
    }

    #[must_use]
    pub fn resolve(&self, iri: &Url) -> Option<&Location> {
        self.entries.get(iri)
    }

    /// Lookup by textual IRI; unparsable IRIs never match.
    #[must_use]
    pub fn resolve_str(&self, iri: &str) -> Option<&Location> {
        Url::parse(iri).ok().and_then(|url| self.resolve(&url))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
