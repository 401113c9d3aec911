// src/lib.rs

//! Product Studio - a single-page editor for product listings with
//! variant-aware form state, image previews and submission to a product
//! service

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]
#![allow(clippy::large_enum_variant)]

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    if let Err(e) = tracing_wasm::try_set_as_global_default() {
        web_sys::console::error_1(&format!("Failed to set up tracing: {:?}", e).into());
    }

    tracing::info!("Starting Product Studio v{}", VERSION);
    dioxus::launch(ui::App);
}

// Core modules (always available)
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod platform;
pub mod ui;

// Native-only modules
#[cfg(not(target_arch = "wasm32"))]
pub mod draft_file;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use form::{FormStore, ProductForm};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
