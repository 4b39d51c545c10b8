use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::StatsRow;
use crate::error::ReportError;

/// How an existing report file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep existing rows and add only stores not yet present
    Append,

    /// Replace the file
    Overwrite,
}

/// CSV report of store statistics.
pub struct CsvReport {
    path: PathBuf,
    writer: csv::Writer<File>,
    existing: HashSet<String>,
}

impl CsvReport {
    /// Open the report at `path`.
    ///
    /// In append mode the URLs already in the file are remembered so
    /// [`contains`](Self::contains) can skip them; a header is written only
    /// when the file is new or empty.
    pub fn open(path: impl AsRef<Path>, mode: WriteMode) -> Result<Self, ReportError> {
        let path = path.as_ref().to_path_buf();

        let (file, existing) = match mode {
            WriteMode::Overwrite => (File::create(&path)?, HashSet::new()),
            WriteMode::Append => {
                let existing = read_existing_urls(&path)?;
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                (file, existing)
            }
        };

        let needs_header = file.metadata()?.len() == 0;
        let writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        debug!(
            path = %path.display(),
            existing = existing.len(),
            needs_header = needs_header,
            "Opened CSV report"
        );

        Ok(Self {
            path,
            writer,
            existing,
        })
    }

    /// Whether a row for `url` was already present when the report was opened.
    pub fn contains(&self, url: &str) -> bool {
        self.existing.contains(url)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row.
    pub fn write_row(&mut self, row: &StatsRow) -> Result<(), ReportError> {
        self.writer.serialize(row)?;
        Ok(())
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        info!("Results written to {}", self.path.display());
        Ok(())
    }
}

fn read_existing_urls(path: &Path) -> Result<HashSet<String>, ReportError> {
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let Some(url_index) = headers.iter().position(|h| h == "url") else {
        return Ok(HashSet::new());
    };

    let mut urls = HashSet::new();
    for record in reader.records() {
        if let Some(url) = record?.get(url_index) {
            urls.insert(url.to_string());
        }
    }
    Ok(urls)
}
