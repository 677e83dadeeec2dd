use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;

use super::VariableSource;
use super::cursor::RecordCursor;
use crate::error::SourceError;
use crate::scope::Vars;

/// Records read from a JSON array of flat objects.
#[derive(Debug)]
pub struct JsonFileSource {
    name: String,
    file: PathBuf,
    fields: Option<Vec<String>>,
    records: OnceLock<RecordCursor>,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, fields: Option<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            fields,
            records: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
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
        let content = std::fs::read_to_string(&self.file).map_err(|err| SourceError::ReadFile {
            name: self.name.clone(),
            path: self.file.clone(),
            source: err,
        })?;
        let parsed: Value =
            serde_json::from_str(&content).map_err(|err| SourceError::ParseJson {
                name: self.name.clone(),
                path: self.file.clone(),
                source: err,
            })?;
        let Value::Array(items) = parsed else {
            return Err(SourceError::NotAnArray {
                name: self.name.clone(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                return Err(SourceError::RecordNotObject {
                    name: self.name.clone(),
                    index,
                });
            };
            for (field, value) in &object {
                if value.is_object() || value.is_array() {
                    return Err(SourceError::NestedValue {
                        name: self.name.clone(),
                        index,
                        field: field.clone(),
                    });
                }
            }
            let record = match self.fields.as_ref() {
                Some(fields) => {
                    let mut projected = Vars::new();
                    for field in fields {
                        let value = object.get(field).ok_or_else(|| SourceError::MissingField {
                            name: self.name.clone(),
                            index,
                            field: field.clone(),
                        })?;
                        projected.insert(field.clone(), value.clone());
                    }
                    projected
                }
                None => object.into_iter().collect(),
            };
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

impl PartialEq for JsonFileSource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.file == other.file && self.fields == other.fields
    }
}

impl VariableSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), SourceError> {
        if self.records.get().is_some() {
            return Ok(());
        }
        let records = self.load()?;
        debug!(
            "Loaded {} records for variable source '{}'.",
            records.len(),
            self.name
        );
        // A concurrent init may have won; both loaded the same file.
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
