use crate::error::Result;
use crate::models::ExportContext;
use crate::readers::header::interpret_header;
use crate::utils::constants::{CSV_DELIMITER, DEFAULT_BUFFER_SIZE, HEADER_ROWS};
use csv::{Reader, ReaderBuilder, StringRecordsIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Streams rows from a single semicolon-delimited export.
///
/// Rows are returned as raw string records; the reader imposes no column
/// count so short and malformed rows reach the point builder, which decides
/// what to drop.
pub struct ExportReader<R> {
    reader: Reader<R>,
}

impl ExportReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = Self::builder().from_path(path)?;
        Ok(Self { reader })
    }
}

impl<R: Read> ExportReader<R> {
    pub fn from_reader(rdr: R) -> Self {
        Self {
            reader: Self::builder().from_reader(rdr),
        }
    }

    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(CSV_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .buffer_capacity(DEFAULT_BUFFER_SIZE);
        builder
    }

    /// Consume the three header rows and interpret them.
    ///
    /// Must be called before [`ExportReader::rows`]; anything read afterwards
    /// is a data row.
    pub fn read_header(&mut self) -> Result<ExportContext> {
        let mut rows = Vec::with_capacity(HEADER_ROWS);
        for record in self.reader.records().take(HEADER_ROWS) {
            rows.push(record?);
        }
        interpret_header(&rows)
    }

    pub fn rows(&mut self) -> StringRecordsIter<'_, R> {
        self.reader.records()
    }
}
