// src/form/model.rs - Product, variant and image records held by the form

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Error;
use crate::form::arena::{Arena, ImageId, VariantId};

/// Top-level text fields of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Description,
    Category,
    Ratings,
}

impl ProductField {
    pub const ALL: [ProductField; 4] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Category,
        ProductField::Ratings,
    ];

    /// Name used by the input element and the submitted payload
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Ratings => "ratings",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                Error::contract("update_product_field", format!("Unknown product field '{}'", s))
            })
    }
}

/// Per-variant fields editable through the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantField {
    Label,
    Price,
    OriginalPrice,
    Stock,
    Discount,
    Quantity,
}

impl VariantField {
    pub const ALL: [VariantField; 6] = [
        VariantField::Label,
        VariantField::Price,
        VariantField::OriginalPrice,
        VariantField::Stock,
        VariantField::Discount,
        VariantField::Quantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Price => "price",
            Self::OriginalPrice => "originalPrice",
            Self::Stock => "stock",
            Self::Discount => "discount",
            Self::Quantity => "quantity",
        }
    }

    /// Fields converted to numbers at submit time
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Label)
    }
}

impl fmt::Display for VariantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "original_price" {
            return Ok(Self::OriginalPrice);
        }

        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                Error::contract("update_variant_field", format!("Unknown variant field '{}'", s))
            })
    }
}

/// A file picked by the user. Only the name ever leaves the client.
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Guesses the MIME type from the file extension
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime_type = crate::form::image::mime_from_name(&name).to_string();

        Self {
            name,
            mime_type,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// An image attached to a variant, with its on-screen preview
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file: ImageFile,
    /// `data:` URL of the file contents
    pub preview: String,
    pub name: String,
}

impl ImageUpload {
    pub fn new(file: ImageFile, preview: String) -> Self {
        let name = file.name.clone();
        Self {
            file,
            preview,
            name,
        }
    }
}

/// One purchasable configuration of the product, as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDraft {
    pub label: String,
    pub price: String,
    pub original_price: String,
    pub stock: String,
    pub discount: String,
    pub quantity: String,
    pub images: Arena<ImageId, ImageUpload>,
}

impl Default for VariantDraft {
    fn default() -> Self {
        Self {
            label: String::new(),
            price: String::new(),
            original_price: String::new(),
            stock: String::new(),
            discount: "0".to_string(),
            quantity: "1".to_string(),
            images: Arena::new(),
        }
    }
}

impl VariantDraft {
    pub fn field(&self, field: VariantField) -> &str {
        match field {
            VariantField::Label => &self.label,
            VariantField::Price => &self.price,
            VariantField::OriginalPrice => &self.original_price,
            VariantField::Stock => &self.stock,
            VariantField::Discount => &self.discount,
            VariantField::Quantity => &self.quantity,
        }
    }

    fn field_mut(&mut self, field: VariantField) -> &mut String {
        match field {
            VariantField::Label => &mut self.label,
            VariantField::Price => &mut self.price,
            VariantField::OriginalPrice => &mut self.original_price,
            VariantField::Stock => &mut self.stock,
            VariantField::Discount => &mut self.discount,
            VariantField::Quantity => &mut self.quantity,
        }
    }

    /// Copy of this variant with one field replaced
    pub fn with_field(&self, field: VariantField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.field_mut(field) = value.into();
        next
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// The whole form: one product and its variants
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub ratings: String,
    pub is_variant_based: bool,
    pub(super) variants: Arena<VariantId, VariantDraft>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductDraft {
    /// Empty form with a single blank variant
    pub fn new() -> Self {
        let mut variants = Arena::new();
        variants.push(VariantId::new(), VariantDraft::default());

        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            ratings: "0".to_string(),
            is_variant_based: true,
            variants,
        }
    }

    pub fn field(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Description => &self.description,
            ProductField::Category => &self.category,
            ProductField::Ratings => &self.ratings,
        }
    }

    pub(super) fn field_mut(&mut self, field: ProductField) -> &mut String {
        match field {
            ProductField::Name => &mut self.name,
            ProductField::Description => &mut self.description,
            ProductField::Category => &mut self.category,
            ProductField::Ratings => &mut self.ratings,
        }
    }

    pub fn variants(&self) -> &Arena<VariantId, VariantDraft> {
        &self.variants
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn variant(&self, id: VariantId) -> Option<&Arc<VariantDraft>> {
        self.variants.get(id)
    }

    pub fn variant_at(&self, index: usize) -> Option<&Arc<VariantDraft>> {
        self.variants.get_at(index)
    }

    pub fn variant_id_at(&self, index: usize) -> Option<VariantId> {
        self.variants.id_at(index)
    }

    /// True when the content matches a freshly created form, ignoring ids
    pub fn is_pristine(&self) -> bool {
        let blank = Self::new();

        self.name == blank.name
            && self.description == blank.description
            && self.category == blank.category
            && self.ratings == blank.ratings
            && self.is_variant_based
            && self.variant_count() == 1
            && self
                .variant_at(0)
                .is_some_and(|variant| **variant == VariantDraft::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_has_one_blank_variant() {
        let draft = ProductDraft::new();

        assert_eq!(draft.variant_count(), 1);
        assert_eq!(draft.ratings, "0");
        assert!(draft.is_variant_based);
        assert!(draft.is_pristine());

        let variant = draft.variant_at(0).unwrap();
        assert_eq!(variant.quantity, "1");
        assert_eq!(variant.discount, "0");
        assert!(variant.original_price.is_empty());
        assert_eq!(variant.image_count(), 0);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ProductField::ALL {
            assert_eq!(field.as_str().parse::<ProductField>().unwrap(), field);
        }
        for field in VariantField::ALL {
            assert_eq!(field.as_str().parse::<VariantField>().unwrap(), field);
        }
        assert_eq!(
            "original_price".parse::<VariantField>().unwrap(),
            VariantField::OriginalPrice
        );
        assert!("colour".parse::<VariantField>().is_err());
        assert!("price".parse::<ProductField>().is_err());
    }

    #[test]
    fn test_with_field_leaves_original_untouched() {
        let variant = VariantDraft::default();
        let edited = variant.with_field(VariantField::Price, "10");

        assert_eq!(edited.field(VariantField::Price), "10");
        assert!(variant.price.is_empty());
        assert!(VariantField::Price.is_numeric());
        assert!(!VariantField::Label.is_numeric());
    }

    #[test]
    fn test_image_file_guesses_mime() {
        let file = ImageFile::new("Photo.JPG", vec![1u8, 2, 3]);
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.size(), 3);

        let upload = ImageUpload::new(file, "data:image/jpeg;base64,AQID".to_string());
        assert_eq!(upload.name, "Photo.JPG");
    }
}
