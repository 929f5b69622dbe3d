//! Contracts of the structured document capability.
//!
//! The core never interprets axioms or annotations. It only moves them between
//! documents, so both are opaque associated types compared by equality.

pub mod memory;

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::{ImportMap, Location, RequiredCategory, ValidationError};
use crate::network::FetchFailure;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Could not load ontology from '{location}': {source}")]
    Fetch {
        location: String,
        #[source]
        source: FetchFailure,
    },
    #[error("Could not load imported ontology '{iri}': {source}")]
    MissingImport {
        iri: String,
        #[source]
        source: Box<ModelError>,
    },
    #[error("Invalid import: {0}")]
    ImportLocation(#[from] ValidationError),
    #[error("Malformed ontology document: {0}")]
    Malformed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Ontology identity: IRI plus optional version IRI. Both absent for anonymous ontologies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_iri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_iri: Option<String>,
}

impl DocumentId {
    #[must_use]
    pub fn new(ontology_iri: impl Into<String>) -> Self {
        Self {
            ontology_iri: Some(ontology_iri.into()),
            version_iri: None,
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            ontology_iri: None,
            version_iri: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version_iri: impl Into<String>) -> Self {
        self.version_iri = Some(version_iri.into());
        self
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.ontology_iri.is_none()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.ontology_iri, &self.version_iri) {
            (Some(iri), Some(version)) => write!(f, "<{iri}> <{version}>"),
            (Some(iri), None) => write!(f, "<{iri}>"),
            _ => f.write_str("<anonymous>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    NamedIndividual,
    AnnotationProperty,
    Datatype,
}

impl EntityKind {
    /// Every kind, in the order signatures are walked.
    pub const ALL: [Self; 6] = [
        Self::Class,
        Self::ObjectProperty,
        Self::DataProperty,
        Self::NamedIndividual,
        Self::AnnotationProperty,
        Self::Datatype,
    ];
}

/// A named entity of a document's signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub iri: String,
}

impl Entity {
    #[must_use]
    pub fn new(kind: EntityKind, iri: impl Into<String>) -> Self {
        Self {
            kind,
            iri: iri.into(),
        }
    }

    #[must_use]
    pub fn class(iri: impl Into<String>) -> Self {
        Self::new(EntityKind::Class, iri)
    }

    #[must_use]
    pub fn individual(iri: impl Into<String>) -> Self {
        Self::new(EntityKind::NamedIndividual, iri)
    }
}

/// A structured ontology document owned by the document capability.
pub trait OntologyDocument: Sized {
    type Axiom: Clone + Eq + Hash + Debug;
    type Annotation: Clone + Eq + Hash + Debug;

    /// An empty document with the given identity.
    fn create(id: DocumentId) -> Self;

    fn id(&self) -> &DocumentId;

    /// All axioms, annotation assertions included.
    fn axioms(&self) -> Vec<Self::Axiom>;

    /// IRIs named by import declarations.
    fn imports(&self) -> Vec<String>;

    /// Document-level annotations.
    fn annotations(&self) -> Vec<Self::Annotation>;

    /// Entities of `kind` in the signature.
    fn entities(&self, kind: EntityKind) -> Vec<Entity>;

    fn annotation_assertions(&self, entity: &Entity) -> Vec<Self::Axiom>;

    fn add_axiom(&mut self, axiom: Self::Axiom);

    fn add_axioms<I: IntoIterator<Item = Self::Axiom>>(&mut self, axioms: I) {
        for axiom in axioms {
            self.add_axiom(axiom);
        }
    }

    fn add_import(&mut self, iri: String);

    fn add_annotation(&mut self, annotation: Self::Annotation);

    fn to_text(&self) -> ModelResult<String>;

    fn from_text(text: &str) -> ModelResult<Self>;
}

/// What to do when an imported ontology cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingImportPolicy {
    /// Skip the import and keep going
    Silent,
    /// Fail the whole load
    #[default]
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Alternate locations consulted before any import is resolved
    pub mappings: ImportMap,
    pub missing_imports: MissingImportPolicy,
    /// Category every unmapped import IRI must satisfy
    pub import_category: RequiredCategory,
}

/// A loaded document together with the documents it imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument<D> {
    pub document: D,
    pub imports: Vec<LoadedDocument<D>>,
}

impl<D: OntologyDocument> LoadedDocument<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            imports: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_import(mut self, import: Self) -> Self {
        self.imports.push(import);
        self
    }

    pub fn direct_imports(&self) -> impl Iterator<Item = &D> {
        self.imports.iter().map(|loaded| &loaded.document)
    }

    /// This document and everything it transitively imports, each named ontology once.
    pub fn imports_closure(&self) -> Vec<&D> {
        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        let mut pending = vec![self];

        while let Some(loaded) = pending.pop() {
            let id = loaded.document.id();
            if !id.is_anonymous() && !seen.insert(id.clone()) {
                continue;
            }
            closure.push(&loaded.document);
            pending.extend(loaded.imports.iter().rev());
        }

        closure
    }

    /// Copy the axioms of every direct import into the root document.
    pub fn merge_direct_imports(&mut self) {
        let axioms: Vec<D::Axiom> = self.direct_imports().flat_map(D::axioms).collect();
        self.document.add_axioms(axioms);
    }

    /// Copy the axioms of the whole import closure into the root document.
    pub fn merge_imports_closure(&mut self) {
        let axioms: Vec<D::Axiom> = self
            .imports_closure()
            .into_iter()
            .skip(1)
            .flat_map(D::axioms)
            .collect();
        self.document.add_axioms(axioms);
    }

    pub fn into_document(self) -> D {
        self.document
    }
}

/// Structural loading, delegated to the document capability.
#[async_trait::async_trait]
pub trait DocumentLoader: Send + Sync {
    type Document: OntologyDocument + Send;

    /// Load `location` and its imports.
    ///
    /// Every import listed in `options.mappings` must be read from its mapped
    /// location instead of its own IRI.
    async fn load(
        &self,
        location: &Location,
        options: &LoadOptions,
    ) -> ModelResult<LoadedDocument<Self::Document>>;
}
