//! Merge inferred axioms back with the authoring metadata the reasoner drops.

use std::collections::HashMap;

use thiserror::Error;

use super::{Reasoner, ReasoningError};
use crate::model::{DocumentId, Entity, EntityKind, ModelError, OntologyDocument};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Reasoning failed: {0}")]
    Reasoning(#[source] ReasoningError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<ReasoningError> for ReconcileError {
    fn from(e: ReasoningError) -> Self {
        match e {
            ReasoningError::Model(model) => Self::Model(model),
            other => Self::Reasoning(other),
        }
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Metadata of a document captured before it is replaced by its inferred form.
#[derive(Debug, Clone)]
pub struct Snapshot<D: OntologyDocument> {
    id: DocumentId,
    imports: Vec<String>,
    annotations: Vec<D::Annotation>,
    entity_annotations: HashMap<Entity, Vec<D::Axiom>>,
}

impl<D: OntologyDocument> Snapshot<D> {
    pub fn capture(document: &D) -> Self {
        let mut entity_annotations = HashMap::new();
        for kind in EntityKind::ALL {
            for entity in document.entities(kind) {
                let assertions = document.annotation_assertions(&entity);
                if !assertions.is_empty() {
                    entity_annotations.insert(entity, assertions);
                }
            }
        }

        Self {
            id: document.id().clone(),
            imports: document.imports(),
            annotations: document.annotations(),
            entity_annotations,
        }
    }

    pub const fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Annotation assertions recorded for `entity`, empty when there were none.
    pub fn assertions_for(&self, entity: &Entity) -> &[D::Axiom] {
        self.entity_annotations
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Build a fresh document seeded with `inferred` and carrying this snapshot's metadata.
    ///
    /// Entity annotations are attached only to entities present in the rebuilt
    /// document's signature.
    pub fn rebuild(&self, inferred: &D) -> D {
        let mut rebuilt = D::create(inferred.id().clone());
        rebuilt.add_axioms(inferred.axioms());

        for iri in &self.imports {
            rebuilt.add_import(iri.clone());
        }
        for annotation in &self.annotations {
            rebuilt.add_annotation(annotation.clone());
        }

        for kind in EntityKind::ALL {
            for entity in rebuilt.entities(kind) {
                let assertions = self.assertions_for(&entity).to_vec();
                rebuilt.add_axioms(assertions);
            }
        }

        rebuilt
    }
}

/// Run `reasoner` over `original` and restore the metadata inference discards.
///
/// When the reasoner cannot be configured or set up, `original` is returned
/// unchanged.
pub fn reconcile<D, R>(original: D, reasoner: &mut R) -> ReconcileResult<D>
where
    D: OntologyDocument,
    R: Reasoner<D> + ?Sized,
{
    let inferred = match materialize(&original, reasoner) {
        Ok(inferred) => inferred,
        Err(e) if e.is_setup() => {
            tracing::warn!(
                ontology = %original.id(),
                error = %e,
                "Reasoning unavailable, keeping unreasoned document"
            );
            return Ok(original);
        }
        Err(e) => return Err(e.into()),
    };

    let snapshot = Snapshot::capture(&original);
    drop(original);

    let rebuilt = snapshot.rebuild(&inferred);
    tracing::debug!(ontology = %rebuilt.id(), "Reconciled inferred document");
    Ok(rebuilt)
}

fn materialize<D, R>(original: &D, reasoner: &mut R) -> Result<D, ReasoningError>
where
    D: OntologyDocument,
    R: Reasoner<D> + ?Sized,
{
    reasoner.prepare(original)?;
    reasoner.infer(original)
}
