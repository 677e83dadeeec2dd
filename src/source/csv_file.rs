use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;

use super::VariableSource;
use super::cursor::RecordCursor;
use crate::error::SourceError;
use crate::scope::Vars;

pub const DEFAULT_DELIMITER: u8 = b',';

/// Rows read from a delimiter-separated text file.
///
/// Without `fields` the first row is the header. With `fields` the columns are
/// named by the list, and `ignore_first_line` drops a header row that is being
/// renamed.
#[derive(Debug)]
pub struct CsvFileSource {
    name: String,
    file: PathBuf,
    delimiter: u8,
    ignore_first_line: bool,
    fields: Option<Vec<String>>,
    records: OnceLock<RecordCursor>,
}

impl CsvFileSource {
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            delimiter: DEFAULT_DELIMITER,
            ignore_first_line: false,
            fields: None,
            records: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub const fn with_ignore_first_line(mut self, ignore_first_line: bool) -> Self {
        self.ignore_first_line = ignore_first_line;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Option<Vec<String>>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    #[must_use]
    pub const fn ignore_first_line(&self) -> bool {
        self.ignore_first_line
    }

    #[must_use]
    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    /// Number of loaded records, once initialized.
    #[must_use]
    pub fn record_count(&self) -> Option<usize> {
        self.records.get().map(RecordCursor::len)
    }

    fn load(&self) -> Result<Vec<Vars>, SourceError> {
        let file = std::fs::File::open(&self.file).map_err(|err| SourceError::ReadFile {
            name: self.name.clone(),
            path: self.file.clone(),
            source: err,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let parse_error = |err: csv::Error| SourceError::ParseCsv {
            name: self.name.clone(),
            path: self.file.clone(),
            source: err,
        };

        let mut rows = reader.records();
        let mut consumed_rows = 0usize;
        let columns: Vec<String> = match self.fields.as_ref() {
            Some(fields) => {
                if self.ignore_first_line
                    && let Some(first) = rows.next()
                {
                    first.map_err(parse_error)?;
                    consumed_rows = 1;
                }
                fields.clone()
            }
            None => {
                let header = rows
                    .next()
                    .ok_or_else(|| SourceError::MissingHeader {
                        name: self.name.clone(),
                    })?
                    .map_err(parse_error)?;
                consumed_rows = 1;
                header.iter().map(str::to_owned).collect()
            }
        };

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            let row = row.map_err(parse_error)?;
            if row.len() != columns.len() {
                return Err(SourceError::ColumnCountMismatch {
                    name: self.name.clone(),
                    row: index.saturating_add(consumed_rows).saturating_add(1),
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            let record: Vars = columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.clone(), Value::String(value.to_owned())))
                .collect();
            records.push(record);
        }

        if records.is_empty() {
            return Err(SourceError::Empty {
                name: self.name.clone(),
            });
        }
        Ok(records)
    }
}

impl PartialEq for CsvFileSource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.file == other.file
            && self.delimiter == other.delimiter
            && self.ignore_first_line == other.ignore_first_line
            && self.fields == other.fields
    }
}

impl VariableSource for CsvFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), SourceError> {
        if self.records.get().is_some() {
            return Ok(());
        }
        let records = self.load()?;
        debug!(
            "Loaded {} rows for variable source '{}'.",
            records.len(),
            self.name
        );
        drop(self.records.set(RecordCursor::new(records)));
        Ok(())
    }

    fn variables(&self) -> Result<Vars, SourceError> {
        let records = self
            .records
            .get()
            .ok_or_else(|| SourceError::NotInitialized {
                name: self.name.clone(),
            })?;
        records.next().ok_or_else(|| SourceError::Empty {
            name: self.name.clone(),
        })
    }
}
