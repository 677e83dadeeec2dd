//! Variable sources: where per-iteration input data comes from.
mod csv_file;
mod cursor;
mod inline;
mod json_file;


use crate::error::SourceError;
use crate::scope::Vars;

pub use csv_file::{CsvFileSource, DEFAULT_DELIMITER};
pub use inline::InlineSource;
pub use json_file::JsonFileSource;

pub const JSON_FILE_KIND: &str = "file/json";
pub const CSV_FILE_KIND: &str = "file/csv";
pub const INLINE_KIND: &str = "variables";

pub trait VariableSource: Send + Sync {
    fn name(&self) -> &str;

    /// Opens and validates the backing data. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing file is unreadable or malformed.
    fn init(&self) -> Result<(), SourceError>;

    /// Values exposed for one iteration. File-backed sources advance to the
    /// next record on every call and wrap around after the last one.
    ///
    /// # Errors
    ///
    /// Returns an error when the source has not been initialized.
    fn variables(&self) -> Result<Vars, SourceError>;
}

#[derive(Debug, PartialEq)]
pub enum Source {
    JsonFile(JsonFileSource),
    CsvFile(CsvFileSource),
    Inline(InlineSource),
}

impl Source {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Source::JsonFile(_) => JSON_FILE_KIND,
            Source::CsvFile(_) => CSV_FILE_KIND,
            Source::Inline(_) => INLINE_KIND,
        }
    }

    #[must_use]
    pub fn record_count(&self) -> Option<usize> {
        match self {
            Source::JsonFile(source) => source.record_count(),
            Source::CsvFile(source) => source.record_count(),
            Source::Inline(_) => None,
        }
    }
}

impl VariableSource for Source {
    fn name(&self) -> &str {
        match self {
            Source::JsonFile(source) => source.name(),
            Source::CsvFile(source) => source.name(),
            Source::Inline(source) => source.name(),
        }
    }

    fn init(&self) -> Result<(), SourceError> {
        match self {
            Source::JsonFile(source) => source.init(),
            Source::CsvFile(source) => source.init(),
            Source::Inline(source) => source.init(),
        }
    }

    fn variables(&self) -> Result<Vars, SourceError> {
        match self {
            Source::JsonFile(source) => source.variables(),
            Source::CsvFile(source) => source.variables(),
            Source::Inline(source) => source.variables(),
        }
    }
}

impl From<JsonFileSource> for Source {
    fn from(source: JsonFileSource) -> Self {
        Source::JsonFile(source)
    }
}

impl From<CsvFileSource> for Source {
    fn from(source: CsvFileSource) -> Self {
        Source::CsvFile(source)
    }
}

impl From<InlineSource> for Source {
    fn from(source: InlineSource) -> Self {
        Source::Inline(source)
    }
}
