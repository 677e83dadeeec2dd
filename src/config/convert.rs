use std::path::PathBuf;
use std::time::Duration;

use http::Method;

use crate::ammo::{AmmoModel, RequestStep, Scenario, StepRef};
use crate::error::ConfigError;
use crate::postprocess::Extractor;
use crate::source::{
    CSV_FILE_KIND, CsvFileSource, DEFAULT_DELIMITER, INLINE_KIND, InlineSource, JSON_FILE_KIND,
    JsonFileSource, Source, VariableSource,
};
use crate::template::StepTemplater;

use super::types::{
    AmmoDocument, PostprocessorBlock, RequestBlock, ScenarioBlock, SourceBlock, TemplaterField,
};

const METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::TRACE,
    Method::CONNECT,
];

/// Describes `model` as a document, preserving declaration order.
#[must_use]
pub fn from_model(model: &AmmoModel) -> AmmoDocument {
    AmmoDocument {
        variable_sources: model.sources().iter().map(source_block).collect(),
        requests: model.steps().iter().map(request_block).collect(),
        scenarios: model.scenarios().iter().map(scenario_block).collect(),
    }
}

/// Validates `document` and builds the model it describes.
///
/// # Errors
///
/// Returns the first unknown tag, missing attribute, malformed expression, or
/// model invariant violation.
pub fn to_model(document: AmmoDocument) -> Result<AmmoModel, ConfigError> {
    let sources = document
        .variable_sources
        .into_iter()
        .map(source_from_block)
        .collect::<Result<Vec<_>, _>>()?;
    let steps = document
        .requests
        .into_iter()
        .map(step_from_block)
        .collect::<Result<Vec<_>, _>>()?;
    let scenarios = document
        .scenarios
        .into_iter()
        .map(scenario_from_block)
        .collect::<Result<Vec<_>, _>>()?;
    AmmoModel::new(sources, steps, scenarios)
}

fn source_block(source: &Source) -> SourceBlock {
    let mut block = SourceBlock {
        name: source.name().to_owned(),
        kind: source.kind().to_owned(),
        ..SourceBlock::default()
    };
    match source {
        Source::JsonFile(json) => {
            block.file = Some(json.file().to_string_lossy().into_owned());
            block.fields = json.fields().map(<[String]>::to_vec);
        }
        Source::CsvFile(csv) => {
            block.file = Some(csv.file().to_string_lossy().into_owned());
            block.ignore_first_line = Some(csv.ignore_first_line());
            block.delimiter = Some(char::from(csv.delimiter()).to_string());
            block.fields = csv.fields().map(<[String]>::to_vec);
        }
        Source::Inline(inline) => {
            block.variables = Some(inline.literals().clone());
        }
    }
    block
}

fn request_block(step: &RequestStep) -> RequestBlock {
    RequestBlock {
        name: step.name.clone(),
        method: step.method.as_str().to_owned(),
        uri: step.uri.clone(),
        body: step.body.clone(),
        templater: (!step.templater.is_default())
            .then(|| TemplaterField::Name(step.templater.kind().to_owned())),
        headers: step.headers.clone(),
        postprocessors: step
            .postprocessors
            .iter()
            .map(|extractor| PostprocessorBlock {
                kind: extractor.kind().to_owned(),
                mapping: extractor.mapping().clone(),
            })
            .collect(),
    }
}

fn scenario_block(scenario: &Scenario) -> ScenarioBlock {
    ScenarioBlock {
        name: scenario.name.clone(),
        weight: scenario.weight,
        min_waiting_time: scenario
            .min_waiting_time
            .map(|wait| u64::try_from(wait.as_millis()).unwrap_or(u64::MAX)),
        requests: scenario.refs.iter().map(ToString::to_string).collect(),
    }
}

fn source_from_block(block: SourceBlock) -> Result<Source, ConfigError> {
    let SourceBlock {
        name,
        kind,
        file,
        ignore_first_line,
        delimiter,
        fields,
        variables,
    } = block;

    match kind.as_str() {
        JSON_FILE_KIND => {
            let file = file.ok_or_else(|| ConfigError::SourceMissingFile { name: name.clone() })?;
            Ok(JsonFileSource::new(name, PathBuf::from(file), fields).into())
        }
        CSV_FILE_KIND => {
            let file = file.ok_or_else(|| ConfigError::SourceMissingFile { name: name.clone() })?;
            let delimiter = match delimiter {
                Some(value) => parse_delimiter(&name, &value)?,
                None => DEFAULT_DELIMITER,
            };
            Ok(CsvFileSource::new(name, PathBuf::from(file))
                .with_delimiter(delimiter)
                .with_ignore_first_line(ignore_first_line.unwrap_or(false))
                .with_fields(fields)
                .into())
        }
        INLINE_KIND => {
            let variables =
                variables.ok_or_else(|| ConfigError::SourceMissingVariables { name: name.clone() })?;
            Ok(InlineSource::new(name, variables).into())
        }
        _ => Err(ConfigError::UnknownSourceType { name, kind }),
    }
}

fn parse_delimiter(name: &str, value: &str) -> Result<u8, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() => u8::try_from(ch).map_err(|_err| {
            ConfigError::InvalidDelimiter {
                name: name.to_owned(),
                value: value.to_owned(),
            }
        }),
        _ => Err(ConfigError::InvalidDelimiter {
            name: name.to_owned(),
            value: value.to_owned(),
        }),
    }
}

fn parse_method(step: &str, value: &str) -> Result<Method, ConfigError> {
    let upper = value.trim().to_ascii_uppercase();
    METHODS
        .iter()
        .find(|method| method.as_str() == upper)
        .cloned()
        .ok_or_else(|| ConfigError::InvalidMethod {
            step: step.to_owned(),
            method: value.to_owned(),
        })
}

fn step_from_block(block: RequestBlock) -> Result<RequestStep, ConfigError> {
    let RequestBlock {
        name,
        method,
        uri,
        body,
        templater,
        headers,
        postprocessors,
    } = block;

    let method = parse_method(&name, &method)?;
    let templater = match templater {
        None => StepTemplater::default(),
        Some(field) => {
            StepTemplater::from_kind(field.kind()).ok_or_else(|| ConfigError::UnknownTemplater {
                step: name.clone(),
                kind: field.kind().to_owned(),
            })?
        }
    };
    let postprocessors = postprocessors
        .into_iter()
        .map(|block| Extractor::build(&name, &block.kind, block.mapping))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RequestStep {
        name,
        method,
        uri,
        headers,
        body,
        postprocessors,
        templater,
    })
}

fn scenario_from_block(block: ScenarioBlock) -> Result<Scenario, ConfigError> {
    let refs = block
        .requests
        .iter()
        .map(|value| {
            value
                .parse::<StepRef>()
                .map_err(|source| ConfigError::InvalidStepReference {
                    scenario: block.name.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Scenario {
        name: block.name,
        weight: block.weight,
        min_waiting_time: block.min_waiting_time.map(Duration::from_millis),
        refs,
    })
}
