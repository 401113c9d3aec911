// src/form/payload.rs - Normalization of the draft into the submitted JSON

use serde::Serialize;

use crate::form::model::{ProductDraft, ProductField, VariantDraft, VariantField};

/// Converts user-typed text to a number the way a browser's `Number()`
/// does. Text that is not a number becomes NaN.
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        return parse_radix(&text[2..], radix);
    }

    let is_decimal = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));

    if is_decimal {
        text.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * radix as f64 + digit as f64)
    })
    .unwrap_or(f64::NAN)
}

/// One variant as sent to the listing service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPayload {
    pub label: String,
    pub price: f64,
    pub original_price: f64,
    pub stock: f64,
    pub discount: f64,
    pub quantity: f64,
    /// File names only; image bytes are never sent
    pub images: Vec<String>,
}

impl VariantPayload {
    pub fn from_draft(variant: &VariantDraft) -> Self {
        Self {
            label: variant.label.clone(),
            price: coerce_number(&variant.price),
            original_price: coerce_number(&variant.original_price),
            stock: coerce_number(&variant.stock),
            discount: coerce_number(&variant.discount),
            quantity: coerce_number(&variant.quantity),
            images: variant
                .images
                .values()
                .map(|image| image.name.clone())
                .collect(),
        }
    }
}

/// Body of `POST /api/products`.
///
/// The top-level pricing fields are fixed placeholders; per-variant values
/// carry the real prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub ratings: f64,
    pub is_variant_based: bool,
    pub variants: Vec<VariantPayload>,
    pub quantity: u32,
    pub discount: f64,
    pub original_price: f64,
    pub price: Option<f64>,
    pub images: Vec<String>,
    pub stock: Option<f64>,
}

impl ProductPayload {
    pub fn from_draft(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            ratings: coerce_number(&draft.ratings),
            is_variant_based: draft.is_variant_based,
            variants: draft
                .variants()
                .values()
                .map(|variant| VariantPayload::from_draft(variant))
                .collect(),
            quantity: 1,
            discount: 0.0,
            original_price: 0.0,
            price: None,
            images: Vec::new(),
            stock: None,
        }
    }

    pub fn to_json(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    NotANumber,
}

/// A submit-time problem with one field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldIssue {
    #[error("{field} is required")]
    Missing { field: String },
    #[error("Variant #{variant}: {field} is required")]
    VariantMissing { variant: usize, field: String },
    #[error("{field} is not a number")]
    NotANumber { field: String },
    #[error("Variant #{variant}: {field} is not a number")]
    VariantNotANumber { variant: usize, field: String },
}

impl FieldIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::Missing { .. } | Self::VariantMissing { .. } => IssueKind::Missing,
            Self::NotANumber { .. } | Self::VariantNotANumber { .. } => IssueKind::NotANumber,
        }
    }

    /// Dotted path of the field, e.g. `variants[1].price`
    pub fn path(&self) -> String {
        match self {
            Self::Missing { field } | Self::NotANumber { field } => field.clone(),
            Self::VariantMissing { variant, field } | Self::VariantNotANumber { variant, field } => {
                format!("variants[{}].{}", variant - 1, field)
            }
        }
    }
}

const REQUIRED_PRODUCT_FIELDS: [ProductField; 3] = [
    ProductField::Name,
    ProductField::Description,
    ProductField::Category,
];

const REQUIRED_VARIANT_FIELDS: [VariantField; 5] = [
    VariantField::Label,
    VariantField::Price,
    VariantField::OriginalPrice,
    VariantField::Stock,
    VariantField::Discount,
];

/// Checks the fields the form marks as required. With `strict_numbers`,
/// numeric fields that coerce to NaN are reported too. Variants are
/// numbered from 1 as on screen.
pub fn validate_draft(draft: &ProductDraft, strict_numbers: bool) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for field in REQUIRED_PRODUCT_FIELDS {
        if draft.field(field).trim().is_empty() {
            issues.push(FieldIssue::Missing {
                field: field.to_string(),
            });
        }
    }

    if strict_numbers && coerce_number(&draft.ratings).is_nan() {
        issues.push(FieldIssue::NotANumber {
            field: ProductField::Ratings.to_string(),
        });
    }

    for (index, variant) in draft.variants().values().enumerate() {
        let number = index + 1;

        for field in REQUIRED_VARIANT_FIELDS {
            if variant.field(field).trim().is_empty() {
                issues.push(FieldIssue::VariantMissing {
                    variant: number,
                    field: field.to_string(),
                });
            }
        }

        if strict_numbers {
            for field in VariantField::ALL.into_iter().filter(VariantField::is_numeric) {
                if coerce_number(variant.field(field)).is_nan() {
                    issues.push(FieldIssue::VariantNotANumber {
                        variant: number,
                        field: field.to_string(),
                    });
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::reducer::{form_reducer, FormAction};
    use serde_json::json;

    fn set_variant(draft: &ProductDraft, index: usize, field: VariantField, value: &str) -> ProductDraft {
        form_reducer(
            draft,
            FormAction::SetVariantField {
                variant: draft.variant_id_at(index).unwrap(),
                field,
                value: value.to_string(),
            },
        )
    }

    fn set_product(draft: &ProductDraft, field: ProductField, value: &str) -> ProductDraft {
        form_reducer(
            draft,
            FormAction::SetProductField {
                field,
                value: value.to_string(),
            },
        )
    }

    fn honey_draft() -> ProductDraft {
        let mut draft = ProductDraft::new();
        draft = set_product(&draft, ProductField::Name, "Honey");
        draft = set_product(&draft, ProductField::Description, "Raw wildflower honey");
        draft = set_product(&draft, ProductField::Category, "Pantry");
        draft = set_variant(&draft, 0, VariantField::Label, "100g");
        draft = set_variant(&draft, 0, VariantField::Price, "10");
        draft = set_variant(&draft, 0, VariantField::OriginalPrice, "12");
        draft = set_variant(&draft, 0, VariantField::Stock, "5");
        draft
    }

    #[test]
    fn test_coerce_number_matches_browser_rules() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number(" 42 "), 42.0);
        assert_eq!(coerce_number("-3.5"), -3.5);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("5."), 5.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number("0x1F"), 31.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);

        for text in ["abc", "12abc", "1,000", ".", "0x", "-0x10", "inf", "NaN", "1e", "infinity"] {
            assert!(coerce_number(text).is_nan(), "{:?} should be NaN", text);
        }
    }

    #[test]
    fn test_single_variant_payload() {
        let payload = ProductPayload::from_draft(&honey_draft());

        let expected = json!({
            "name": "Honey",
            "description": "Raw wildflower honey",
            "category": "Pantry",
            "ratings": 0.0,
            "isVariantBased": true,
            "variants": [{
                "label": "100g",
                "price": 10.0,
                "originalPrice": 12.0,
                "stock": 5.0,
                "discount": 0.0,
                "quantity": 1.0,
                "images": []
            }],
            "quantity": 1,
            "discount": 0.0,
            "originalPrice": 0.0,
            "price": null,
            "images": [],
            "stock": null
        });

        assert_eq!(payload.to_json().unwrap(), expected);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let draft = set_variant(&honey_draft(), 0, VariantField::Price, "ten");
        let value = ProductPayload::from_draft(&draft).to_json().unwrap();

        assert!(value["variants"][0]["price"].is_null());
        assert_eq!(value["variants"][0]["stock"], json!(5.0));
    }

    #[test]
    fn test_variant_order_and_image_names() {
        use crate::form::arena::ImageId;
        use crate::form::model::{ImageFile, ImageUpload};

        let mut draft = form_reducer(&honey_draft(), FormAction::add_variant());
        draft = set_variant(&draft, 1, VariantField::Label, "500g");
        let second = draft.variant_id_at(1).unwrap();
        let images = ["front.png", "back.png"]
            .into_iter()
            .map(|name| {
                let file = ImageFile::new(name, vec![0u8]);
                (ImageId::new(), ImageUpload::new(file, String::new()))
            })
            .collect();
        draft = form_reducer(
            &draft,
            FormAction::AppendImages {
                variant: second,
                images,
            },
        );

        let payload = ProductPayload::from_draft(&draft);
        let labels: Vec<_> = payload.variants.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["100g", "500g"]);
        assert_eq!(payload.variants[1].images, vec!["front.png", "back.png"]);
        assert!(payload.variants[0].images.is_empty());
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        assert!(validate_draft(&honey_draft(), false).is_empty());

        let issues = validate_draft(&ProductDraft::new(), false);
        assert!(issues.contains(&FieldIssue::Missing {
            field: "name".to_string()
        }));
        assert!(issues.contains(&FieldIssue::VariantMissing {
            variant: 1,
            field: "originalPrice".to_string()
        }));
        assert!(issues.iter().all(|issue| issue.kind() == IssueKind::Missing));
    }

    #[test]
    fn test_strict_numbers_flags_nan() {
        let draft = set_variant(&honey_draft(), 0, VariantField::Stock, "lots");

        assert!(validate_draft(&draft, false).is_empty());

        let issues = validate_draft(&draft, true);
        assert_eq!(
            issues,
            vec![FieldIssue::VariantNotANumber {
                variant: 1,
                field: "stock".to_string()
            }]
        );
        assert_eq!(issues[0].path(), "variants[0].stock");
        assert_eq!(issues[0].to_string(), "Variant #1: stock is not a number");
    }
}
