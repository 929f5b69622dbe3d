use std::io::Write;

use anyhow::{Context, Result};
use lode_core::{ImportMap, LodeConfig, OntologyParser, ParseMode};

pub async fn run(
    config: LodeConfig,
    location: &str,
    imports: Option<&str>,
    mode: ParseMode,
) -> Result<()> {
    let mut parser = OntologyParser::json(config)?;
    let imports = match imports {
        Some(text) => parser
            .import_map(text)
            .context("invalid --imports mapping")?,
        None => ImportMap::new(),
    };

    let text = parser.parse(location, &imports, mode).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
