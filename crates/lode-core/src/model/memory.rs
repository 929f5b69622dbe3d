//! In-memory reference implementation of the document capability.
//!
//! Documents are plain sets serialised as JSON. There is no OWL semantics here: the
//! signature of an axiom is simply the entities it names.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::{
    DocumentId, DocumentLoader, Entity, EntityKind, LoadOptions, LoadedDocument,
    MissingImportPolicy, ModelError, ModelResult, OntologyDocument,
};
use crate::location::{check_category, validate_required, Location};
use crate::network::ContentFetcher;

pub const JSON_CONTENT_TYPES: &[&str] = &["application/json", "*/*"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Literal {
    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            lang: None,
        }
    }

    #[must_use]
    pub fn lang(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            ..Self::plain(lexical)
        }
    }

    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            datatype: Some(datatype.into()),
            ..Self::plain(lexical)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    Iri(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    pub property: String,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Axiom {
    Declaration {
        entity: Entity,
    },
    SubClassOf {
        sub: String,
        sup: String,
    },
    ClassAssertion {
        class: String,
        individual: String,
    },
    ObjectPropertyAssertion {
        property: String,
        subject: String,
        object: String,
    },
    DataPropertyAssertion {
        property: String,
        subject: String,
        value: Literal,
    },
    AnnotationAssertion {
        property: String,
        subject: String,
        value: AnnotationValue,
    },
}

impl Axiom {
    #[must_use]
    pub const fn declaration(entity: Entity) -> Self {
        Self::Declaration { entity }
    }

    #[must_use]
    pub fn sub_class_of(sub: impl Into<String>, sup: impl Into<String>) -> Self {
        Self::SubClassOf {
            sub: sub.into(),
            sup: sup.into(),
        }
    }

    #[must_use]
    pub fn label(subject: impl Into<String>, label: Literal) -> Self {
        Self::AnnotationAssertion {
            property: RDFS_LABEL.to_string(),
            subject: subject.into(),
            value: AnnotationValue::Literal(label),
        }
    }

    /// Entities named by this axiom. Annotation subjects are plain IRIs, not entities.
    #[must_use]
    pub fn signature(&self) -> Vec<Entity> {
        match self {
            Self::Declaration { entity } => vec![entity.clone()],
            Self::SubClassOf { sub, sup } => vec![Entity::class(sub), Entity::class(sup)],
            Self::ClassAssertion { class, individual } => {
                vec![Entity::class(class), Entity::individual(individual)]
            }
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => vec![
                Entity::new(EntityKind::ObjectProperty, property),
                Entity::individual(subject),
                Entity::individual(object),
            ],
            Self::DataPropertyAssertion {
                property,
                subject,
                value,
            } => {
                let mut entities = vec![
                    Entity::new(EntityKind::DataProperty, property),
                    Entity::individual(subject),
                ];
                entities.extend(literal_datatype(value));
                entities
            }
            Self::AnnotationAssertion {
                property, value, ..
            } => {
                let mut entities = vec![Entity::new(EntityKind::AnnotationProperty, property)];
                if let AnnotationValue::Literal(literal) = value {
                    entities.extend(literal_datatype(literal));
                }
                entities
            }
        }
    }

    fn annotation_subject(&self) -> Option<&str> {
        match self {
            Self::AnnotationAssertion { subject, .. } => Some(subject.as_str()),
            _ => None,
        }
    }
}

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

fn literal_datatype(literal: &Literal) -> Option<Entity> {
    literal
        .datatype
        .as_ref()
        .map(|dt| Entity::new(EntityKind::Datatype, dt))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    #[serde(default)]
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub imports: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub annotations: BTreeSet<Annotation>,
    #[serde(default)]
    pub axioms: BTreeSet<Axiom>,
}

impl OntologyDocument for MemoryDocument {
    type Axiom = Axiom;
    type Annotation = Annotation;

    fn create(id: DocumentId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn axioms(&self) -> Vec<Axiom> {
        self.axioms.iter().cloned().collect()
    }

    fn imports(&self) -> Vec<String> {
        self.imports.iter().cloned().collect()
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.annotations.iter().cloned().collect()
    }

    fn entities(&self, kind: EntityKind) -> Vec<Entity> {
        self.axioms
            .iter()
            .flat_map(Axiom::signature)
            .filter(|entity| entity.kind == kind)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn annotation_assertions(&self, entity: &Entity) -> Vec<Axiom> {
        self.axioms
            .iter()
            .filter(|axiom| axiom.annotation_subject() == Some(entity.iri.as_str()))
            .cloned()
            .collect()
    }

    fn add_axiom(&mut self, axiom: Axiom) {
        self.axioms.insert(axiom);
    }

    fn add_import(&mut self, iri: String) {
        self.imports.insert(iri);
    }

    fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.insert(annotation);
    }

    fn to_text(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    fn from_text(text: &str) -> ModelResult<Self> {
        serde_json::from_str(text).map_err(|e| ModelError::Malformed(e.to_string()))
    }
}

type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = ModelResult<LoadedDocument<MemoryDocument>>> + Send + 'a>>;

#[derive(Default)]
struct LoadState {
    /// Import IRIs currently being loaded, to break cycles
    in_progress: HashSet<String>,
    loaded: HashMap<String, LoadedDocument<MemoryDocument>>,
}

/// Loads JSON-serialised [`MemoryDocument`]s through a [`ContentFetcher`].
#[derive(Clone)]
pub struct JsonDocumentLoader {
    fetcher: ContentFetcher,
}

impl JsonDocumentLoader {
    pub const fn new(fetcher: ContentFetcher) -> Self {
        Self { fetcher }
    }

    fn load_tree<'a>(
        &'a self,
        location: Location,
        options: &'a LoadOptions,
        state: &'a mut LoadState,
    ) -> LoadFuture<'a> {
        Box::pin(async move {
            let fetched = self
                .fetcher
                .fetch_as(&location, JSON_CONTENT_TYPES)
                .await
                .map_err(|source| ModelError::Fetch {
                    location: location.to_string(),
                    source,
                })?;
            let document = MemoryDocument::from_text(&fetched.body)?;
            let mut loaded = LoadedDocument::new(document);

            for iri in loaded.document.imports() {
                if state.in_progress.contains(&iri) {
                    tracing::trace!(%iri, "Import cycle, not descending");
                    continue;
                }
                if let Some(cached) = state.loaded.get(&iri) {
                    loaded.imports.push(cached.clone());
                    continue;
                }

                match self.load_import(&iri, options, state).await {
                    Ok(import) => {
                        state.loaded.insert(iri, import.clone());
                        loaded.imports.push(import);
                    }
                    Err(e) if options.missing_imports == MissingImportPolicy::Silent => {
                        tracing::warn!(%iri, error = %e, "Skipping import that could not be loaded");
                    }
                    Err(e) => {
                        return Err(ModelError::MissingImport {
                            iri,
                            source: Box::new(e),
                        });
                    }
                }
            }

            Ok(loaded)
        })
    }

    async fn load_import(
        &self,
        iri: &str,
        options: &LoadOptions,
        state: &mut LoadState,
    ) -> ModelResult<LoadedDocument<MemoryDocument>> {
        let location = match options.mappings.resolve_str(iri) {
            Some(mapped) => {
                let context = format!("Invalid URI to be mapped to '{iri}'");
                check_category(mapped, options.import_category, &context)?;
                tracing::debug!(%iri, location = %mapped, "Import mapped to alternate location");
                mapped.clone()
            }
            None => validate_required(iri, options.import_category, "Invalid import IRI")?,
        };

        state.in_progress.insert(iri.to_string());
        let result = self.load_tree(location, options, state).await;
        state.in_progress.remove(iri);
        result
    }
}

#[async_trait::async_trait]
impl DocumentLoader for JsonDocumentLoader {
    type Document = MemoryDocument;

    async fn load(
        &self,
        location: &Location,
        options: &LoadOptions,
    ) -> ModelResult<LoadedDocument<MemoryDocument>> {
        let mut state = LoadState::default();
        self.load_tree(location.clone(), options, &mut state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{classify, ImportMap, RequiredCategory, ValidationError};
    use crate::network::FetchConfig;

    fn sample() -> MemoryDocument {
        let mut doc = MemoryDocument::create(DocumentId::new("http://example.org/onto"));
        doc.add_import("http://example.org/base".into());
        doc.add_annotation(Annotation {
            property: "http://purl.org/dc/terms/title".into(),
            value: AnnotationValue::Literal(Literal::lang("Example", "en")),
        });
        doc.add_axiom(Axiom::declaration(Entity::class("http://example.org/onto#A")));
        doc.add_axiom(Axiom::sub_class_of(
            "http://example.org/onto#A",
            "http://example.org/onto#B",
        ));
        doc.add_axiom(Axiom::label("http://example.org/onto#A", Literal::lang("A thing", "en")));
        doc.add_axiom(Axiom::DataPropertyAssertion {
            property: "http://example.org/onto#age".into(),
            subject: "http://example.org/onto#bob".into(),
            value: Literal::typed("42", "http://www.w3.org/2001/XMLSchema#integer"),
        });
        doc
    }

    #[test]
    fn test_signature_by_kind() {
        let doc = sample();

        assert_eq!(
            doc.entities(EntityKind::Class),
            vec![
                Entity::class("http://example.org/onto#A"),
                Entity::class("http://example.org/onto#B"),
            ]
        );
        assert_eq!(doc.entities(EntityKind::NamedIndividual).len(), 1);
        assert_eq!(doc.entities(EntityKind::DataProperty).len(), 1);
        assert_eq!(
            doc.entities(EntityKind::AnnotationProperty),
            vec![Entity::new(EntityKind::AnnotationProperty, RDFS_LABEL)]
        );
        assert_eq!(
            doc.entities(EntityKind::Datatype),
            vec![Entity::new(
                EntityKind::Datatype,
                "http://www.w3.org/2001/XMLSchema#integer"
            )]
        );
        assert!(doc.entities(EntityKind::ObjectProperty).is_empty());
    }

    #[test]
    fn test_annotation_subject_is_not_in_signature() {
        let mut doc = MemoryDocument::create(DocumentId::anonymous());
        doc.add_axiom(Axiom::label("http://example.org/onto#Ghost", Literal::plain("ghost")));
        assert!(doc.entities(EntityKind::Class).is_empty());
    }

    #[test]
    fn test_annotation_assertions_for_entity() {
        let doc = sample();
        let assertions = doc.annotation_assertions(&Entity::class("http://example.org/onto#A"));
        assert_eq!(assertions.len(), 1);
        assert!(doc
            .annotation_assertions(&Entity::class("http://example.org/onto#B"))
            .is_empty());
    }

    #[test]
    fn test_serialize_then_deserialize_preserves_identity_and_axioms() {
        let doc = sample();
        let text = doc.to_text().unwrap();
        let parsed = MemoryDocument::from_text(&text).unwrap();

        assert_eq!(parsed.id(), doc.id());
        assert_eq!(parsed.axioms, doc.axioms);
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(matches!(
            MemoryDocument::from_text("<rdf:RDF/>"),
            Err(ModelError::Malformed(_))
        ));
    }

    /// A local root importing `http://example.org/mid`, with mid mapped onto a local file.
    fn root_with_local_mapping(dir: &std::path::Path) -> (Location, ImportMap) {
        let mut root = MemoryDocument::create(DocumentId::new("http://example.org/root"));
        root.add_import("http://example.org/mid".into());
        let root_path = dir.join("root.json");
        std::fs::write(&root_path, root.to_text().unwrap()).unwrap();

        let mut secret = MemoryDocument::create(DocumentId::new("http://example.org/mid"));
        secret.add_axiom(Axiom::declaration(Entity::class("http://secret#FromDisk")));
        let secret_path = dir.join("secret.json");
        std::fs::write(&secret_path, secret.to_text().unwrap()).unwrap();

        let mut mappings = ImportMap::new();
        mappings.insert(
            url::Url::parse("http://example.org/mid").unwrap(),
            classify(secret_path.to_str().unwrap(), true).unwrap(),
        );
        (classify(root_path.to_str().unwrap(), true).unwrap(), mappings)
    }

    fn loader() -> JsonDocumentLoader {
        JsonDocumentLoader::new(ContentFetcher::new(FetchConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_mapped_import_must_satisfy_import_category() {
        let dir = tempfile::tempdir().unwrap();
        let (root, mappings) = root_with_local_mapping(dir.path());

        let options = LoadOptions {
            mappings,
            missing_imports: MissingImportPolicy::Fail,
            import_category: RequiredCategory::WebAbsolute,
        };
        let err = loader().load(&root, &options).await.unwrap_err();

        match err {
            ModelError::MissingImport { iri, source } => {
                assert_eq!(iri, "http://example.org/mid");
                assert!(matches!(
                    *source,
                    ModelError::ImportLocation(ValidationError::NotWebAbsolute { .. })
                ));
            }
            other => panic!("expected MissingImport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_mapping_is_skipped_when_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (root, mappings) = root_with_local_mapping(dir.path());

        let options = LoadOptions {
            mappings,
            missing_imports: MissingImportPolicy::Silent,
            import_category: RequiredCategory::WebAny,
        };
        let loaded = loader().load(&root, &options).await.unwrap();

        assert!(loaded.imports.is_empty());
    }

    #[tokio::test]
    async fn test_mapped_import_loads_when_local_files_are_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let (root, mappings) = root_with_local_mapping(dir.path());

        let options = LoadOptions {
            mappings,
            missing_imports: MissingImportPolicy::Fail,
            import_category: RequiredCategory::Any,
        };
        let loaded = loader().load(&root, &options).await.unwrap();

        assert_eq!(loaded.imports.len(), 1);
        assert_eq!(
            loaded.imports[0].document.entities(EntityKind::Class),
            vec![Entity::class("http://secret#FromDisk")]
        );
    }

    #[test]
    fn test_axiom_json_shape() {
        let json = serde_json::to_value(Axiom::sub_class_of("http://a#A", "http://a#B")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "sub_class_of", "sub": "http://a#A", "sup": "http://a#B"})
        );
    }
}
