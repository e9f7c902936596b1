use crate::csv_processor::reader::Row;
use crate::utils::{PayrollSortError, Result};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const DEST_DELIMITER: u8 = b',';
pub const QUOTE: u8 = b'"';

pub struct SortedCsvWriter {
    path: PathBuf,
    writer: Writer<File>,
    rows_written: usize,
}

impl SortedCsvWriter {
    /// Creates or truncates `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| PayrollSortError::Write {
            path: path.clone(),
            source: e.into(),
        })?;
        let writer = WriterBuilder::new()
            .delimiter(DEST_DELIMITER)
            .quote(QUOTE)
            .quote_style(QuoteStyle::Necessary)
            .double_quote(true)
            .terminator(Terminator::CRLF)
            .flexible(true)
            .from_writer(file);

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.writer
            .write_record(&row.fields)
            .map_err(|e| PayrollSortError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flushes and closes the file, returning the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|e| PayrollSortError::Write {
            path: self.path.clone(),
            source: e.into(),
        })?;
        Ok(self.rows_written)
    }
}

pub fn write_rows(path: impl AsRef<Path>, rows: &[Row]) -> Result<usize> {
    let mut writer = SortedCsvWriter::create(path)?;
    writer.write_rows(rows)?;
    let written = writer.finish()?;
    tracing::info!("Wrote {} rows", written);
    Ok(written)
}
