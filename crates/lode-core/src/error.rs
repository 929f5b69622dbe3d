use thiserror::Error;

use crate::location::ValidationError;
use crate::model::ModelError;
use crate::network::{ClientError, FetchFailure};
use crate::reasoning::ReconcileError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
