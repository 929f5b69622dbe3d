use std::io::Write;

use anyhow::Result;
use lode_core::{LodeConfig, OntologyParser};

pub async fn run(config: LodeConfig, location: &str) -> Result<()> {
    let parser = OntologyParser::json(config)?;
    let text = parser.source(location).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
