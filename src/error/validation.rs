use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid step reference '{value}'. Expected 'name' or 'name(count)'.")]
    InvalidStepReference { value: String },
    #[error("Step reference name must not be empty.")]
    StepReferenceNameEmpty,
    #[error("Invalid count in step reference '{value}': {source}")]
    InvalidRepeatCount {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Repeat count in step reference '{value}' must be >= 1.")]
    ZeroRepeatCount { value: String },
    #[error("Header expression must name a header.")]
    HeaderNameEmpty,
    #[error("Unknown header modifier '{value}'. Use lower, upper, substr(start,end), or replace(from,to).")]
    UnknownHeaderModifier { value: String },
    #[error("Invalid arguments for header modifier '{value}'.")]
    InvalidModifierArguments { value: String },
    #[error("Invalid JSONPath '{expression}': {message}")]
    InvalidJsonPath { expression: String, message: String },
    #[error("Invalid XPath '{expression}': {message}")]
    InvalidXPath { expression: String, message: String },
    #[error("Invalid boolean value '{value}'. Use true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Invalid number: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
