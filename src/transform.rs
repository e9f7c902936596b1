//! The read → drop header → sort → write pipeline.
//!
//! The whole dataset is loaded and every sort key validated before the
//! destination is opened, so a source that fails to parse never touches the
//! output path.

use crate::csv_processor::{read_dataset, sort_rows, write_rows};
use crate::utils::{PathsConfig, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub rows_read: usize,
    pub header_dropped: bool,
    pub rows_written: usize,
}

pub struct Transformer {
    paths: PathsConfig,
}

impl Transformer {
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }

    pub fn run(&self) -> Result<TransformReport> {
        let source = &self.paths.source_path;
        let dest = &self.paths.dest_path;
        tracing::info!("Sorting {} into {}", source.display(), dest.display());

        let dataset = read_dataset(source)?;
        let rows_read = dataset.rows_read();
        let header_dropped = dataset.header.is_some();
        if dataset.rows.is_empty() {
            tracing::warn!("{} holds no data rows", source.display());
        }

        let sorted = sort_rows(dataset.rows)?;
        let rows_written = write_rows(dest, &sorted)?;

        Ok(TransformReport {
            source_path: source.clone(),
            dest_path: dest.clone(),
            rows_read,
            header_dropped,
            rows_written,
        })
    }
}
