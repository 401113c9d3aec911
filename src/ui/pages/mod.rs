// src/ui/pages/mod.rs - Page components module

mod not_found;
mod product_form;

pub use not_found::NotFound;
pub use product_form::{PageForm, ProductFormPage};
