use crate::race::RaceOutcome;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON document handed to whatever renders the shareable image.
#[derive(Debug, Serialize)]
pub struct Export<'a> {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub races: &'a [RaceOutcome],
}

impl<'a> Export<'a> {
    pub fn new(races: &'a [RaceOutcome]) -> Self {
        Self {
            version: 1,
            exported_at: Utc::now(),
            races,
        }
    }
}

pub fn to_json(races: &[RaceOutcome]) -> Result<String> {
    serde_json::to_string_pretty(&Export::new(races)).context("Failed to serialize rankings")
}

/// Save rankings to a JSON file atomically
///
/// Uses atomic-write-file so a reader never sees a half-written export.
pub fn save_export(path: &Path, races: &[RaceOutcome]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &Export::new(races))
        .context("Failed to serialize rankings")?;
    file.write_all(b"\n").context("Failed to write rankings")?;

    file.commit()
        .with_context(|| format!("Failed to save rankings to {}", path.display()))?;

    tracing::debug!(path = %path.display(), races = races.len(), "rankings exported");
    Ok(())
}
