// src/api/mod.rs - Submission of finished listings to the product service

use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::form::ProductPayload;
use crate::platform::network::{NetworkArc, NetworkRequest};
use crate::platform::PlatformBounds;

/// Delivers a normalized payload and returns the service's reply
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait ProductSubmitter: PlatformBounds {
    async fn submit(&self, payload: &ProductPayload) -> Result<Value>;
}

/// Posts JSON to the configured products endpoint
pub struct HttpSubmitter {
    network: NetworkArc,
    url: String,
    timeout_ms: u64,
}

impl std::fmt::Debug for HttpSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSubmitter")
            .field("url", &self.url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl HttpSubmitter {
    pub fn new(network: NetworkArc, url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            network,
            url: url.into(),
            timeout_ms,
        }
    }

    pub fn from_config(network: NetworkArc, config: &ApiConfig) -> Self {
        Self::new(network, config.products_url(), config.timeout_ms)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl ProductSubmitter for HttpSubmitter {
    async fn submit(&self, payload: &ProductPayload) -> Result<Value> {
        let body = serde_json::to_vec(payload)?;
        let request = NetworkRequest::post_json(&self.url, body).with_timeout_ms(self.timeout_ms);

        tracing::debug!(url = %self.url, variants = payload.variants.len(), "Posting product");

        let response = self.network.request(request).await?;

        if !response.is_success() {
            let detail = String::from_utf8_lossy(&response.body);
            return Err(Error::network(
                &self.url,
                Some(response.status_code),
                format!("Product service answered {}", response.status_code),
            )
            .caused_by(detail.trim()));
        }

        Ok(parse_reply(&response.body))
    }
}

/// Reply body as JSON; empty bodies become `null` and anything that is not
/// JSON is kept as a string
fn parse_reply(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Status code of a failed submission, if the server answered at all
pub fn status_code(error: &Error) -> Option<u16> {
    match &error.kind {
        ErrorKind::Network { status_code, .. } => *status_code,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ProductDraft;
    use crate::platform::network::{NetworkProvider, NetworkResponse};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct FakeNetwork {
        status_code: u16,
        body: &'static str,
        seen: Mutex<Vec<NetworkRequest>>,
    }

    impl FakeNetwork {
        fn answering(status_code: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status_code,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl NetworkProvider for FakeNetwork {
        async fn request(&self, request: NetworkRequest) -> Result<NetworkResponse> {
            self.seen.lock().push(request);
            Ok(NetworkResponse {
                status_code: self.status_code,
                headers: HashMap::new(),
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn payload() -> ProductPayload {
        ProductPayload::from_draft(&ProductDraft::new())
    }

    #[tokio::test]
    async fn test_posts_json_to_products_url() {
        let network = FakeNetwork::answering(201, r#"{"id": 7}"#);
        let config = ApiConfig {
            base_url: "http://shop.test/".to_string(),
            ..ApiConfig::default()
        };
        let submitter = HttpSubmitter::from_config(network.clone(), &config);

        let reply = submitter.submit(&payload()).await.unwrap();
        assert_eq!(reply["id"], 7);

        let seen = network.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].url, "http://shop.test/api/products");
        assert_eq!(seen[0].timeout_ms, Some(30_000));

        let sent: Value = serde_json::from_slice(seen[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(sent["isVariantBased"], true);
        assert!(sent["price"].is_null());
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let network = FakeNetwork::answering(422, "label missing");
        let submitter = HttpSubmitter::new(network, "http://shop.test/api/products", 0);

        let error = submitter.submit(&payload()).await.unwrap_err();
        assert_eq!(status_code(&error), Some(422));
        assert_eq!(error.causes, vec!["label missing".to_string()]);
    }

    #[test]
    fn test_parse_reply() {
        assert_eq!(parse_reply(b""), Value::Null);
        assert_eq!(parse_reply(b" \n"), Value::Null);
        assert_eq!(parse_reply(b"created"), Value::String("created".to_string()));
        assert_eq!(parse_reply(b"[1]"), serde_json::json!([1]));
    }
}
