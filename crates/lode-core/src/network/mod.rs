mod client;
mod config;

pub use client::{
    ClientError, ClientResult, ContentFetcher, Diagnostic, FetchFailure, FetchOutcome, Fetched,
};
pub use config::{FetchConfig, FetchConfigError, DEFAULT_CONTENT_TYPES, DEFAULT_USER_AGENT};
