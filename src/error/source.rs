use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Variable source '{name}': failed to read '{path}': {source}")]
    ReadFile {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Variable source '{name}': invalid JSON in '{path}': {source}")]
    ParseJson {
        name: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Variable source '{name}': invalid CSV in '{path}': {source}")]
    ParseCsv {
        name: String,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Variable source '{name}': expected a JSON array of records.")]
    NotAnArray { name: String },
    #[error("Variable source '{name}': record {index} is not a JSON object.")]
    RecordNotObject { name: String, index: usize },
    #[error("Variable source '{name}': record {index} field '{field}' must be a scalar.")]
    NestedValue {
        name: String,
        index: usize,
        field: String,
    },
    #[error("Variable source '{name}': record {index} is missing field '{field}'.")]
    MissingField {
        name: String,
        index: usize,
        field: String,
    },
    #[error("Variable source '{name}': row {row} has {found} columns, expected {expected}.")]
    ColumnCountMismatch {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Variable source '{name}': CSV file has no header row.")]
    MissingHeader { name: String },
    #[error("Variable source '{name}': no records found.")]
    Empty { name: String },
    #[error("Variable source '{name}': variable '{key}' must be a string, number, or boolean.")]
    NonScalarVariable { name: String, key: String },
    #[error("Variable source '{name}' was used before init.")]
    NotInitialized { name: String },
}
