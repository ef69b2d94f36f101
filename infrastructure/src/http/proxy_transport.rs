//! Streaming HTTP transport to the generation proxy.
//!
//! Sends `POST {base_url}{path}` with the JSON body
//! `{ "prompt": ..., "systemInstruction": ... }` and streams the response
//! body back as it arrives. Which encoding that body uses is decided by
//! configuration, not by this adapter.

use arcana_application::{ByteStream, OracleTransport, TransportError};
use arcana_domain::DivinationPrompt;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// [`OracleTransport`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpProxyTransport {
    client: Client,
    endpoint: String,
}

impl HttpProxyTransport {
    /// Build a transport for `base_url` + `path`.
    ///
    /// `timeout` bounds both connecting and the whole streamed request.
    pub fn new(base_url: &str, path: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder =
            Client::builder().user_agent(concat!("arcana/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: join_endpoint(base_url, path),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OracleTransport for HttpProxyTransport {
    async fn open(&self, prompt: &DivinationPrompt) -> Result<ByteStream, TransportError> {
        debug!(endpoint = %self.endpoint, "Opening response stream");

        let response = self
            .client
            .post(&self.endpoint)
            .json(prompt)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "Proxy rejected the request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Err(TransportError::MissingBody);
        }

        let body = response.bytes_stream().map(|read| {
            read.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Read(e.to_string())
                }
            })
        });
        Ok(Box::pin(body))
    }
}

/// Join without doubling or dropping the slash between the two parts.
fn join_endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("http://localhost:3000", "/api/proxy"),
            "http://localhost:3000/api/proxy"
        );
        assert_eq!(
            join_endpoint("http://localhost:3000/", "api/chat"),
            "http://localhost:3000/api/chat"
        );
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let transport =
            HttpProxyTransport::new("http://example.test", "/api/proxy", Some(Duration::from_secs(5)))
                .unwrap();
        assert_eq!(transport.endpoint(), "http://example.test/api/proxy");
    }
}
