use std::path::Path;

use crate::ammo::AmmoModel;
use crate::error::{AppError, AppResult, ConfigError};

use super::convert::to_model;
use super::hcl_surface::parse_document as parse_hcl;
use super::types::AmmoDocument;

/// Reads an ammo document, picking the surface from the file extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub fn load_document(path: &Path) -> AppResult<AmmoDocument> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("hcl") => parse_hcl(path, &content).map_err(AppError::config),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}

/// Reads and validates an ammo document into a model.
///
/// # Errors
///
/// Returns an error when the document cannot be loaded or does not convert.
pub fn load_model(path: &Path) -> AppResult<AmmoModel> {
    let document = load_document(path)?;
    Ok(to_model(document)?)
}

/// Renders a document as TOML tables.
///
/// # Errors
///
/// Returns an error when a value has no TOML representation.
pub fn render_toml(document: &AmmoDocument) -> Result<String, ConfigError> {
    toml::to_string_pretty(document).map_err(|source| ConfigError::RenderToml { source })
}
