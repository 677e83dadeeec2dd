use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[cfg(test)]
    #[error("{message}")]
    Other { message: String },
}
