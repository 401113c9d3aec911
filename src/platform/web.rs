// src/platform/web.rs - Web/WASM platform implementations

use async_trait::async_trait;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::error::{Error, Result};
use crate::platform::network::{NetworkProvider, NetworkRequest, NetworkResponse};

/// HTTP transport backed by `window.fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchNetwork;

impl FetchNetwork {
    pub fn new() -> Self {
        Self
    }
}

fn fetch_error(context: &str, value: wasm_bindgen::JsValue) -> Error {
    Error::platform("web", "network", format!("{}: {:?}", context, value))
}

#[async_trait(?Send)]
impl NetworkProvider for FetchNetwork {
    async fn request(&self, request: NetworkRequest) -> Result<NetworkResponse> {
        let window = web_sys::window()
            .ok_or_else(|| Error::platform("web", "network", "No window object available"))?;

        let opts = RequestInit::new();
        opts.set_method(&request.method);

        if let Some(body) = &request.body {
            let uint8_array = js_sys::Uint8Array::from(&body[..]);
            opts.set_body(&uint8_array);
        }

        let req = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| fetch_error("Failed to create request", e))?;

        for (key, value) in &request.headers {
            req.headers()
                .set(key, value)
                .map_err(|e| fetch_error("Failed to set header", e))?;
        }

        let fetch = JsFuture::from(window.fetch_with_request(&req));
        let response_value = match request.timeout_ms {
            Some(timeout_ms) => {
                let timeout = gloo_timers::future::TimeoutFuture::new(timeout_ms as u32);
                futures::pin_mut!(fetch);
                match futures::future::select(fetch, timeout).await {
                    futures::future::Either::Left((result, _)) => result,
                    futures::future::Either::Right(_) => {
                        return Err(Error::timeout(format!(
                            "Request to {} timed out",
                            request.url
                        ))
                        .source("network"))
                    }
                }
            }
            None => fetch.await,
        }
        .map_err(|e| {
            Error::network(&request.url, None, format!("Fetch failed: {:?}", e))
        })?;

        let response: Response = response_value
            .dyn_into()
            .map_err(|e| fetch_error("Fetch did not return a Response", e))?;
        let status_code = response.status();

        let headers = HashMap::new();

        let buffer = response
            .array_buffer()
            .map_err(|e| fetch_error("Failed to read response body", e))?;
        let body = JsFuture::from(buffer)
            .await
            .map_err(|e| fetch_error("Failed to read response body", e))?;

        Ok(NetworkResponse {
            status_code,
            headers,
            body: js_sys::Uint8Array::new(&body).to_vec(),
        })
    }
}
