//! Entry points turning a location string into document text.

use crate::config::LodeConfig;
use crate::error::Result;
use crate::location::{validate_required, ImportMap, Location};
use crate::model::memory::JsonDocumentLoader;
use crate::model::{DocumentLoader, LoadOptions, MissingImportPolicy, OntologyDocument};
use crate::network::ContentFetcher;
use crate::reasoning::{reconcile, HierarchyReasoner, Reasoner};

/// Independent switches controlling how a document is processed.
///
/// With every switch off the source is returned exactly as fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseMode {
    /// Merge axioms of directly imported ontologies
    pub imported: bool,
    /// Merge axioms of the whole import closure; ignored when `imported` is set
    pub closure: bool,
    /// Add inferred axioms
    pub reasoner: bool,
}

impl ParseMode {
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        !self.imported && !self.closure && !self.reasoner
    }

    const fn follows_imports(&self) -> bool {
        self.imported || self.closure
    }
}

/// Fetches, loads, merges and reasons over ontology definitions.
pub struct OntologyParser<L: DocumentLoader> {
    config: LodeConfig,
    fetcher: ContentFetcher,
    loader: L,
    reasoner: Option<Box<dyn Reasoner<L::Document>>>,
}

impl<L: DocumentLoader> OntologyParser<L> {
    pub fn new(config: LodeConfig, fetcher: ContentFetcher, loader: L) -> Self {
        Self {
            config,
            fetcher,
            loader,
            reasoner: None,
        }
    }

    #[must_use]
    pub fn with_reasoner(mut self, reasoner: impl Reasoner<L::Document> + 'static) -> Self {
        self.reasoner = Some(Box::new(reasoner));
        self
    }

    pub const fn config(&self) -> &LodeConfig {
        &self.config
    }

    /// Parse an import map, holding replacements to the definition category.
    pub fn import_map(&self, text: &str) -> Result<ImportMap> {
        Ok(ImportMap::parse(text, self.config.definition_category())?)
    }

    /// Read or download a definition without interpreting it.
    pub async fn source(&self, location: &str) -> Result<String> {
        let location = self.definition_location(location, "Invalid Ontology Source URI")?;
        Ok(self.fetcher.fetch(&location).await?.body)
    }

    /// Produce the serialised form of the definition at `location`.
    ///
    /// Imports listed in `imports` are read from their mapped locations.
    pub async fn parse(
        &mut self,
        location: &str,
        imports: &ImportMap,
        mode: ParseMode,
    ) -> Result<String> {
        let location = self.definition_location(location, "Invalid Ontology Definition URI")?;

        if mode.is_raw() {
            tracing::debug!(%location, "Returning source unparsed");
            return Ok(self.fetcher.fetch(&location).await?.body);
        }

        let options = LoadOptions {
            mappings: imports.clone(),
            missing_imports: if mode.follows_imports() {
                MissingImportPolicy::Fail
            } else {
                MissingImportPolicy::Silent
            },
            import_category: self.config.definition_category(),
        };

        let mut loaded = self.loader.load(&location, &options).await?;
        if mode.imported {
            loaded.merge_direct_imports();
        } else if mode.closure {
            loaded.merge_imports_closure();
        }

        let mut document = loaded.into_document();
        if mode.reasoner {
            document = self.reason(document)?;
        }

        tracing::info!(%location, ontology = %document.id(), "Parsed ontology");
        Ok(document.to_text()?)
    }

    fn reason(&mut self, document: L::Document) -> Result<L::Document> {
        let Some(reasoner) = self.reasoner.as_deref_mut() else {
            tracing::warn!("No reasoner configured, keeping unreasoned document");
            return Ok(document);
        };
        Ok(reconcile(document, reasoner)?)
    }

    fn definition_location(&self, raw: &str, context: &str) -> Result<Location> {
        Ok(validate_required(
            raw,
            self.config.definition_category(),
            context,
        )?)
    }
}

impl OntologyParser<JsonDocumentLoader> {
    /// A parser over JSON reference documents with the hierarchy reasoner attached.
    pub fn json(config: LodeConfig) -> Result<Self> {
        let fetcher = ContentFetcher::new(config.fetch_config())?;
        let loader = JsonDocumentLoader::new(fetcher.clone());

        let mut reasoner = HierarchyReasoner::new();
        if let Some(path) = &config.reasoner_options {
            reasoner = reasoner.with_options_file(path);
        }

        Ok(Self::new(config, fetcher, loader).with_reasoner(reasoner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::location::ValidationError;

    fn local_config() -> LodeConfig {
        LodeConfig {
            allow_local_definitions: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_flags() {
        assert!(ParseMode::default().is_raw());
        assert!(!ParseMode {
            reasoner: true,
            ..Default::default()
        }
        .is_raw());
        assert!(ParseMode {
            closure: true,
            ..Default::default()
        }
        .follows_imports());
    }

    #[tokio::test]
    async fn test_web_only_deployment_rejects_local_paths() {
        let parser = OntologyParser::json(LodeConfig::default()).unwrap();

        let err = parser.source("/etc/passwd").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NotWebAbsolute { .. })
        ));

        let err = parser.source("file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_web_only_import_map_rejects_local_targets() {
        let parser = OntologyParser::json(LodeConfig::default()).unwrap();
        assert!(parser
            .import_map("http://example.org/base=/tmp/base.json")
            .is_err());

        let parser = OntologyParser::json(local_config()).unwrap();
        let map = parser
            .import_map("http://example.org/base=/tmp/base.json")
            .unwrap();
        assert_eq!(map.len(), 1);
    }

    #[tokio::test]
    async fn test_raw_mode_returns_source_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onto.ttl");
        std::fs::write(&path, "@prefix : <http://example.org/> .\n:a a :B .\n").unwrap();

        let mut parser = OntologyParser::json(local_config()).unwrap();
        let out = parser
            .parse(path.to_str().unwrap(), &ImportMap::new(), ParseMode::default())
            .await
            .unwrap();

        assert_eq!(out, "@prefix : <http://example.org/> .\n:a a :B .\n");
    }

    #[tokio::test]
    async fn test_structured_mode_rejects_non_document_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onto.ttl");
        std::fs::write(&path, ":a a :B .\n").unwrap();

        let mut parser = OntologyParser::json(local_config()).unwrap();
        let err = parser
            .parse(
                path.to_str().unwrap(),
                &ImportMap::new(),
                ParseMode {
                    reasoner: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Model(_)));
    }
}
