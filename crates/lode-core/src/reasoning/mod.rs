mod hierarchy;
mod reconciler;

pub use hierarchy::{HierarchyReasoner, ReasonerOptions};
pub use reconciler::{reconcile, ReconcileError, ReconcileResult, Snapshot};

use thiserror::Error;

use crate::model::{ModelError, OntologyDocument};

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("Reasoner configuration could not be loaded: {0}")]
    Configuration(String),
    #[error("Reasoner setup failed: {0}")]
    Setup(String),
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ReasoningError {
    /// Failures that only mean the optional inference step is unavailable.
    #[must_use]
    pub const fn is_setup(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Setup(_))
    }
}

pub type ReasoningResult<T> = Result<T, ReasoningError>;

/// An external inference capability.
pub trait Reasoner<D: OntologyDocument>: Send {
    /// Load configuration and build whatever the reasoner needs for `document`.
    fn prepare(&mut self, document: &D) -> ReasoningResult<()>;

    /// A new document with the identity of `document` and only the derived axioms.
    fn infer(&mut self, document: &D) -> ReasoningResult<D>;
}
