//! Append-only CSV sink.
//!
//! The header goes out once when the file is opened (truncating any
//! previous snapshot) and every accepted batch is appended and flushed
//! immediately, so a crash mid-run still leaves a valid, readable file.

use crate::error::Result;
use crate::types::{Listing, FIELD_NAMES};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Where accepted listings go. Append-before-advance: a batch is written
/// and flushed before the sweep moves on.
pub trait ListingSink {
    fn append(&mut self, batch: &[Listing]) -> Result<()>;
}

pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Create (or truncate) the snapshot file and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(FIELD_NAMES)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Dated snapshot path within `dir`, e.g. `output/29-08-2026.csv`.
    pub fn dated_path(dir: &Path) -> PathBuf {
        dir.join(format!("{}.csv", Local::now().format("%d-%m-%Y")))
    }
}

impl ListingSink for CsvSink {
    fn append(&mut self, batch: &[Listing]) -> Result<()> {
        for listing in batch {
            self.writer.serialize(listing)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink recording appended batches, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct VecSink {
    pub batches: Vec<Vec<Listing>>,
}

#[cfg(test)]
impl VecSink {
    pub fn rows(&self) -> Vec<&Listing> {
        self.batches.iter().flatten().collect()
    }
}

#[cfg(test)]
impl ListingSink for VecSink {
    fn append(&mut self, batch: &[Listing]) -> Result<()> {
        if !batch.is_empty() {
            self.batches.push(batch.to_vec());
        }
        Ok(())
    }
}
