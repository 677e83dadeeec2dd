//! HCL surface: labeled blocks such as `variable_source "users" "file/csv" { .. }`,
//! `request "auth" { postprocessor "var/jsonpath" { .. } }` and `scenario "main" { .. }`.
use std::path::Path;

use ::hcl::structure::BlockBuilder;
use ::hcl::{Block, Body, Structure};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ConfigError;

use super::types::{AmmoDocument, RequestBlock, ScenarioBlock, SourceBlock};

const SOURCE_BLOCK: &str = "variable_source";
const REQUEST_BLOCK: &str = "request";
const SCENARIO_BLOCK: &str = "scenario";
const POSTPROCESSOR_BLOCK: &str = "postprocessor";
const TEMPLATER_BLOCK: &str = "templater";

/// Parses an HCL ammo document.
///
/// # Errors
///
/// Returns an error for invalid HCL, unknown blocks, wrong label counts, or
/// attributes that do not fit the document types.
pub(super) fn parse_document(path: &Path, content: &str) -> Result<AmmoDocument, ConfigError> {
    let body = ::hcl::parse(content).map_err(|source| ConfigError::ParseHcl {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document = AmmoDocument::default();
    for structure in body.iter() {
        let block = match structure {
            Structure::Block(block) => block,
            Structure::Attribute(attribute) => {
                return Err(invalid(
                    path,
                    attribute.key.as_str(),
                    "top-level attributes are not supported",
                ));
            }
        };
        match block.identifier.as_str() {
            SOURCE_BLOCK => document.variable_sources.push(parse_source(path, block)?),
            REQUEST_BLOCK => document.requests.push(parse_request(path, block)?),
            SCENARIO_BLOCK => document.scenarios.push(parse_scenario(path, block)?),
            other => {
                return Err(invalid(
                    path,
                    other,
                    "unknown block; use variable_source, request, or scenario",
                ));
            }
        }
    }
    Ok(document)
}

fn parse_source(path: &Path, block: &Block) -> Result<SourceBlock, ConfigError> {
    let (name, kind) = match block.labels.as_slice() {
        [name, kind] => (name.as_str(), kind.as_str()),
        _ => {
            return Err(invalid(
                path,
                SOURCE_BLOCK,
                "expected two labels: name and type",
            ));
        }
    };
    reject_nested_blocks(path, block)?;
    let mut fields = attributes(path, block)?;
    fields.insert("name".to_owned(), Value::String(name.to_owned()));
    fields.insert("type".to_owned(), Value::String(kind.to_owned()));
    decode(path, SOURCE_BLOCK, fields)
}

fn parse_request(path: &Path, block: &Block) -> Result<RequestBlock, ConfigError> {
    let name = single_label(path, block)?;
    let mut fields = attributes(path, block)?;
    fields.insert("name".to_owned(), Value::String(name.to_owned()));

    let mut postprocessors = Vec::new();
    for nested in nested_blocks(block) {
        match nested.identifier.as_str() {
            POSTPROCESSOR_BLOCK => {
                let mut postprocessor = attributes(path, nested)?;
                match nested.labels.as_slice() {
                    [kind] => {
                        postprocessor.insert("type".to_owned(), Value::String(kind.as_str().to_owned()));
                    }
                    [] => {}
                    _ => {
                        return Err(invalid(
                            path,
                            POSTPROCESSOR_BLOCK,
                            "expected at most one label: type",
                        ));
                    }
                }
                postprocessors.push(Value::Object(postprocessor));
            }
            TEMPLATER_BLOCK => {
                fields.insert("templater".to_owned(), Value::Object(attributes(path, nested)?));
            }
            other => {
                return Err(invalid(
                    path,
                    other,
                    "unknown block inside request; use postprocessor or templater",
                ));
            }
        }
    }
    if !postprocessors.is_empty() {
        fields.insert("postprocessor".to_owned(), Value::Array(postprocessors));
    }
    decode(path, REQUEST_BLOCK, fields)
}

fn parse_scenario(path: &Path, block: &Block) -> Result<ScenarioBlock, ConfigError> {
    let name = single_label(path, block)?;
    reject_nested_blocks(path, block)?;
    let mut fields = attributes(path, block)?;
    fields.insert("name".to_owned(), Value::String(name.to_owned()));
    decode(path, SCENARIO_BLOCK, fields)
}

fn single_label<'block>(path: &Path, block: &'block Block) -> Result<&'block str, ConfigError> {
    match block.labels.as_slice() {
        [name] => Ok(name.as_str()),
        _ => Err(invalid(
            path,
            block.identifier.as_str(),
            "expected one label: name",
        )),
    }
}

fn nested_blocks(block: &Block) -> impl Iterator<Item = &Block> {
    block.body.iter().filter_map(|structure| match structure {
        Structure::Block(nested) => Some(nested),
        Structure::Attribute(_) => None,
    })
}

fn reject_nested_blocks(path: &Path, block: &Block) -> Result<(), ConfigError> {
    match nested_blocks(block).next() {
        Some(nested) => Err(invalid(
            path,
            nested.identifier.as_str(),
            "unexpected nested block",
        )),
        None => Ok(()),
    }
}

fn attributes(path: &Path, block: &Block) -> Result<Map<String, Value>, ConfigError> {
    let mut fields = Map::new();
    for structure in block.body.iter() {
        if let Structure::Attribute(attribute) = structure {
            let value = serde_json::to_value(&attribute.expr)
                .map_err(|err| invalid(path, attribute.key.as_str(), &err.to_string()))?;
            fields.insert(attribute.key.as_str().to_owned(), value);
        }
    }
    Ok(fields)
}

fn decode<T>(path: &Path, block: &str, fields: Map<String, Value>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| invalid(path, block, &err.to_string()))
}

fn invalid(path: &Path, block: &str, message: &str) -> ConfigError {
    ConfigError::InvalidHclBlock {
        path: path.to_path_buf(),
        block: block.to_owned(),
        message: message.to_owned(),
    }
}

/// Renders a document as HCL labeled blocks.
///
/// # Errors
///
/// Returns an error when a value has no HCL representation.
pub fn render_hcl(document: &AmmoDocument) -> Result<String, ConfigError> {
    let mut body = Body::builder();
    for source in &document.variable_sources {
        let mut block = Block::builder(SOURCE_BLOCK)
            .add_label(source.name.as_str())
            .add_label(source.kind.as_str());
        block = optional(block, "file", source.file.as_ref())?;
        block = optional(block, "fields", source.fields.as_ref())?;
        block = optional(block, "ignore_first_line", source.ignore_first_line.as_ref())?;
        block = optional(block, "delimiter", source.delimiter.as_ref())?;
        block = optional(block, "variables", source.variables.as_ref())?;
        body = body.add_block(block.build());
    }
    for request in &document.requests {
        let mut block = Block::builder(REQUEST_BLOCK).add_label(request.name.as_str());
        block = attribute(block, "method", &request.method)?;
        block = attribute(block, "uri", &request.uri)?;
        if !request.headers.is_empty() {
            block = attribute(block, "headers", &request.headers)?;
        }
        block = optional(block, "body", request.body.as_ref())?;
        if let Some(templater) = &request.templater {
            let nested = attribute(Block::builder(TEMPLATER_BLOCK), "type", templater.kind())?;
            block = block.add_block(nested.build());
        }
        for postprocessor in &request.postprocessors {
            let nested = Block::builder(POSTPROCESSOR_BLOCK).add_label(postprocessor.kind.as_str());
            let nested = attribute(nested, "mapping", &postprocessor.mapping)?;
            block = block.add_block(nested.build());
        }
        body = body.add_block(block.build());
    }
    for scenario in &document.scenarios {
        let mut block = Block::builder(SCENARIO_BLOCK).add_label(scenario.name.as_str());
        block = optional(block, "weight", scenario.weight.as_ref())?;
        block = optional(block, "min_waiting_time", scenario.min_waiting_time.as_ref())?;
        block = attribute(block, "requests", &scenario.requests)?;
        body = body.add_block(block.build());
    }
    ::hcl::to_string(&body.build()).map_err(|source| ConfigError::RenderHcl { source })
}

fn attribute<T>(block: BlockBuilder, key: &str, value: &T) -> Result<BlockBuilder, ConfigError>
where
    T: Serialize + ?Sized,
{
    let expression =
        ::hcl::to_expression(value).map_err(|source| ConfigError::RenderHcl { source })?;
    Ok(block.add_attribute((key, expression)))
}

fn optional<T>(block: BlockBuilder, key: &str, value: Option<&T>) -> Result<BlockBuilder, ConfigError>
where
    T: Serialize,
{
    match value {
        Some(value) => attribute(block, key, value),
        None => Ok(block),
    }
}
