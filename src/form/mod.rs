// src/form/mod.rs

//! Form-state core for a product listing
//!
//! A [`ProductDraft`] holds one product and its variants. Variants and their
//! images live in an [`Arena`] under stable ids, so positions can shift
//! without an edit landing on the wrong record. Every change is a
//! [`FormAction`] reduced by [`form_reducer`] and written through a
//! [`DraftCell`]. [`ProductForm`] wraps a cell with the entry points used by
//! the page and the headless `submit` command.

pub mod arena;
pub mod controller;
pub mod image;
pub mod model;
pub mod notify;
pub mod payload;
pub mod reducer;
pub mod store;

pub use arena::{Arena, ImageId, VariantId};
pub use controller::{ProductForm, SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE};
pub use image::{DataUrlReader, ImageReader, ImageSource, UploadFailure, UploadReport};
pub use model::{ImageFile, ImageUpload, ProductDraft, ProductField, VariantDraft, VariantField};
pub use notify::{NoticeLevel, Notifier, TracingNotifier};
pub use payload::{coerce_number, validate_draft, FieldIssue, ProductPayload, VariantPayload};
pub use reducer::{form_reducer, FormAction};
pub use store::{DraftCell, FormStore};
