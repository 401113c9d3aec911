// src/platform/native.rs - Native platform implementations

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::platform::network::{NetworkProvider, NetworkRequest, NetworkResponse};

/// HTTP transport backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct NativeNetwork {
    client: reqwest::Client,
}

impl NativeNetwork {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NetworkProvider for NativeNetwork {
    async fn request(&self, request: NetworkRequest) -> Result<NetworkResponse> {
        let mut req = match request.method.as_str() {
            "GET" => self.client.get(&request.url),
            "POST" => self.client.post(&request.url),
            "PUT" => self.client.put(&request.url),
            "DELETE" => self.client.delete(&request.url),
            _ => {
                return Err(Error::platform(
                    "native",
                    "network",
                    format!("Unsupported HTTP method: {}", request.method),
                ))
            }
        };

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout_ms) = request.timeout_ms {
            req = req.timeout(Duration::from_millis(timeout_ms));
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("Request to {} timed out", request.url))
                    .source("network")
            } else {
                Error::network(&request.url, None, format!("HTTP request failed: {}", e))
            }
        })?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                Error::network(
                    &request.url,
                    Some(status_code),
                    format!("Failed to read response body: {}", e),
                )
            })?
            .to_vec();

        Ok(NetworkResponse {
            status_code,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_unknown_method() {
        let network = NativeNetwork::new();
        let request = NetworkRequest {
            method: "BREW".to_string(),
            ..NetworkRequest::post_json("http://127.0.0.1:9/", Vec::new())
        };

        let error = network.request(request).await.unwrap_err();
        assert!(matches!(error.kind, crate::error::ErrorKind::Platform { .. }));
    }
}
