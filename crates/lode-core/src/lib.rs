pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod network;
pub mod parse;
pub mod reasoning;
pub mod render;

pub use config::LodeConfig;
pub use error::{Error, Result};
pub use location::{
    classify, validate, validate_path, validate_required, Category, ImportMap, Location,
    RequiredCategory, ValidationError,
};
pub use model::memory::{JsonDocumentLoader, MemoryDocument};
pub use model::{
    DocumentId, DocumentLoader, Entity, EntityKind, LoadOptions, LoadedDocument,
    MissingImportPolicy, ModelError, OntologyDocument,
};
pub use network::{ContentFetcher, Diagnostic, FetchConfig, FetchFailure, Fetched};
pub use parse::{OntologyParser, ParseMode};
pub use reasoning::{
    reconcile, HierarchyReasoner, Reasoner, ReasonerOptions, ReasoningError, ReconcileError,
    Snapshot,
};
pub use render::{PresentationParams, Renderer};
