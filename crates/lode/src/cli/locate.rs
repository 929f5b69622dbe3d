use anyhow::Result;
use lode_core::{validate_required, RequiredCategory};

pub fn run(location: &str, category: RequiredCategory) -> Result<()> {
    let location = validate_required(location, category, "Invalid location")?;
    println!("{}", serde_json::to_string_pretty(&location)?);
    Ok(())
}
