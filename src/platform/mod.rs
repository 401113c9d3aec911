// src/platform/mod.rs - Platform abstraction for the desktop and browser builds

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub mod network;

pub use network::{NetworkArc, NetworkProvider, NetworkRequest, NetworkResponse};

/// Thread-safety required of services shared between tasks. Browser
/// futures run on one thread, so `Send` is only demanded natively.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformBounds: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> PlatformBounds for T {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformBounds: Sync {}

#[cfg(target_arch = "wasm32")]
impl<T: Sync + ?Sized> PlatformBounds for T {}

/// Name reported in logs and platform errors
pub fn platform_name() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "web"
    } else {
        std::env::consts::OS
    }
}

/// Creates the HTTP transport for the current target
pub fn create_network() -> network::NetworkArc {
    #[cfg(not(target_arch = "wasm32"))]
    return std::sync::Arc::new(native::NativeNetwork::new());

    #[cfg(target_arch = "wasm32")]
    return std::sync::Arc::new(web::FetchNetwork::new());
}

/// Waits without blocking the executor
pub async fn sleep(duration: Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;

    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}
