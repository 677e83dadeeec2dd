use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Url};
use tracing::debug;

use super::{RequestParts, ResponseParts, Transport};
use crate::error::TransportError;

/// Shoots step requests over HTTP; step URIs are joined onto `base_url`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Creates a transport with a default client.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an absolute URL.
    pub fn from_base_url(base_url: &str) -> Result<Self, TransportError> {
        let base = Url::parse(base_url).map_err(|err| TransportError::InvalidUrl {
            url: base_url.to_owned(),
            source: err,
        })?;
        Ok(Self::new(Client::new(), base))
    }

    fn resolve_url(&self, uri: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(uri)
            .map_err(|err| TransportError::InvalidUrl {
                url: uri.to_owned(),
                source: err,
            })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestParts) -> Result<ResponseParts, TransportError> {
        let url = self.resolve_url(&request.url)?;
        debug!("{} {}", request.method, url);
        let mut builder = self.client.request(request.method, url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Request { source: err })?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = read_body(response).await?;
        Ok(ResponseParts::new(status, headers, body))
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| TransportError::ReadBody { source: err })?;
        body.extend_from_slice(&bytes);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_joins_relative_uri() -> Result<(), String> {
        let transport = HttpTransport::from_base_url("http://localhost:8080/api/")
            .map_err(|err| err.to_string())?;
        let url = transport
            .resolve_url("items/7?full=1")
            .map_err(|err| err.to_string())?;
        if url.as_str() != "http://localhost:8080/api/items/7?full=1" {
            return Err(format!("Unexpected url: {}", url));
        }
        Ok(())
    }

    #[test]
    fn resolve_url_keeps_absolute_uri() -> Result<(), String> {
        let transport =
            HttpTransport::from_base_url("http://localhost").map_err(|err| err.to_string())?;
        let url = transport
            .resolve_url("https://example.com/auth")
            .map_err(|err| err.to_string())?;
        if url.as_str() != "https://example.com/auth" {
            return Err(format!("Unexpected url: {}", url));
        }
        Ok(())
    }

    #[test]
    fn from_base_url_rejects_relative() -> Result<(), String> {
        if HttpTransport::from_base_url("/relative").is_ok() {
            return Err("Expected relative base url to fail".to_owned());
        }
        Ok(())
    }
}
