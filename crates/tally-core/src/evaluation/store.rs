//! Persisting result sets so summaries can be regenerated without inference.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{DatasetError, Result};
use crate::output::{OutputFormat, OutputWriter};

use super::results::ResultSet;

/// Reads and writes result files as pretty-printed JSON.
pub struct ResultStore;

impl ResultStore {
    /// Write a result set, creating parent directories as needed.
    pub fn save(path: &Path, set: &ResultSet) -> Result<()> {
        let mut writer = OutputWriter::create(path, OutputFormat::Json, true)?;
        writer.write(set)?;
        writer.flush()?;
        tracing::info!("Wrote {} test results to {:?}", set.len(), path);
        Ok(())
    }

    /// Load a result set written by [`ResultStore::save`].
    pub fn load(path: &Path) -> Result<ResultSet> {
        let file = File::open(path).map_err(|source| DatasetError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        let set: ResultSet = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(
            "Loaded {} test results for {} labels from {:?}",
            set.len(),
            set.label_count(),
            path
        );
        Ok(set)
    }
}
