use anyhow::{Context, Result};
use campus_access::Dataset;
use std::path::Path;

pub fn write_sample_data(path: &Path) -> Result<()> {
    Dataset::sample().save_to_file(path).with_context(|| format!("writing sample dataset to {}", path.display()))?;
    println!("Sample academy written to {}", path.display());
    Ok(())
}
