pub mod locate;
pub mod parse;
pub mod source;

use clap::{Parser, Subcommand};
use lode_core::RequiredCategory;

#[derive(Parser)]
#[command(
    name = "lode",
    about = "Fetch, classify and merge ontology definition documents",
    version
)]
pub struct Cli {
    /// Allow definitions to be read from the local filesystem
    #[arg(short = 'l', long = "allow-local", global = true)]
    pub allow_local: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print an ontology definition exactly as fetched
    Source {
        /// File path or URL of the definition
        location: String,
    },
    /// Load a JSON ontology document, merge imports and print the result
    Parse {
        /// File path or URL of the definition
        location: String,
        /// Alternate import locations (url=location|url=location)
        #[arg(long)]
        imports: Option<String>,
        /// Merge axioms of directly imported ontologies
        #[arg(long)]
        imported: bool,
        /// Merge axioms of the whole import closure
        #[arg(long)]
        closure: bool,
        /// Add inferred class hierarchy axioms
        #[arg(long)]
        reasoner: bool,
    },
    /// Classify a location string and print it as JSON
    Locate {
        /// File path, URI or relative reference
        location: String,
        /// Category the location must satisfy
        #[arg(long, default_value = "any")]
        category: RequiredCategory,
    },
}
