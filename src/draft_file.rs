// src/draft_file.rs - JSON drafts for the headless `submit` command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, Result, ResultExt};
use crate::form::{DraftCell, ImageSource, ProductForm, ProductField, UploadReport, VariantField};

/// A value typed into the form. Numbers are accepted for convenience and
/// entered as their decimal text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldText {
    Text(String),
    Number(serde_json::Number),
}

impl FieldText {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantEntry {
    pub label: Option<FieldText>,
    pub price: Option<FieldText>,
    pub original_price: Option<FieldText>,
    pub stock: Option<FieldText>,
    pub discount: Option<FieldText>,
    pub quantity: Option<FieldText>,
    /// Image paths, relative to the draft file
    pub images: Vec<PathBuf>,
}

impl VariantEntry {
    fn fields(&self) -> [(VariantField, Option<&FieldText>); 6] {
        [
            (VariantField::Label, self.label.as_ref()),
            (VariantField::Price, self.price.as_ref()),
            (VariantField::OriginalPrice, self.original_price.as_ref()),
            (VariantField::Stock, self.stock.as_ref()),
            (VariantField::Discount, self.discount.as_ref()),
            (VariantField::Quantity, self.quantity.as_ref()),
        ]
    }
}

/// Product as written by hand or exported by another tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DraftFile {
    pub name: Option<FieldText>,
    pub description: Option<FieldText>,
    pub category: Option<FieldText>,
    pub ratings: Option<FieldText>,
    pub variants: Vec<VariantEntry>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl DraftFile {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read draft {}", path.display()))?;

        let mut draft = Self::parse(&content)?;
        draft.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(draft)
    }

    /// The top level must be a JSON object
    pub fn parse(content: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            Error::config(format!("Invalid draft file: {}", e)).source("draft_file")
        };

        let value: serde_json::Value = serde_json::from_str(content).map_err(invalid)?;
        if !value.is_object() {
            return Err(
                Error::config("Invalid draft file: expected a JSON object").source("draft_file"),
            );
        }

        serde_json::from_value(value).map_err(invalid)
    }

    /// Feeds the draft through the form's entry points, so it is edited
    /// exactly as if typed in. Returns one report per variant with images.
    pub async fn apply_to<C: DraftCell>(&self, form: &ProductForm<C>) -> Result<Vec<UploadReport>> {
        let product_fields = [
            (ProductField::Name, &self.name),
            (ProductField::Description, &self.description),
            (ProductField::Category, &self.category),
            (ProductField::Ratings, &self.ratings),
        ];
        for (field, value) in product_fields {
            if let Some(value) = value {
                form.update_product_field(field, value.clone().into_text());
            }
        }

        let existing = form.snapshot().variant_count();
        for _ in existing..self.variants.len() {
            form.add_variant();
        }

        let mut reports = Vec::new();
        for (index, entry) in self.variants.iter().enumerate() {
            for (field, value) in entry.fields() {
                if let Some(value) = value {
                    form.update_variant_field(index, field, value.clone().into_text())?;
                }
            }

            if entry.images.is_empty() {
                continue;
            }

            let files: Vec<DiskImage> = entry
                .images
                .iter()
                .map(|path| DiskImage::new(self.base_dir.join(path)))
                .collect();
            reports.push(form.upload_images(index, files).await?);
        }

        Ok(reports)
    }
}

/// Image referenced by a draft, read from disk when its batch runs
#[derive(Debug, Clone)]
pub struct DiskImage {
    path: PathBuf,
    name: String,
}

impl DiskImage {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

#[async_trait::async_trait(?Send)]
impl ImageSource for DiskImage {
    fn name(&self) -> &str {
        &self.name
    }

    async fn size(&self) -> Option<u64> {
        tokio::fs::metadata(&self.path).await.ok().map(|meta| meta.len())
    }

    async fn read(&self) -> Result<Arc<[u8]>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read image {}", self.path.display()))?;
        Ok(bytes.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProductSubmitter;
    use crate::error::ErrorKind;
    use crate::form::{DataUrlReader, FormStore, ProductPayload, TracingNotifier};
    use serde_json::Value;
    use std::sync::Arc;

    struct NoSubmit;

    #[async_trait::async_trait]
    impl ProductSubmitter for NoSubmit {
        async fn submit(&self, _payload: &ProductPayload) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    fn form() -> ProductForm<FormStore> {
        ProductForm::new(
            FormStore::new(),
            Arc::new(DataUrlReader),
            Arc::new(NoSubmit),
            Arc::new(TracingNotifier),
        )
    }

    #[test]
    fn test_numbers_become_text() {
        let draft = DraftFile::parse(
            r#"{"name": "Honey", "ratings": 4.5, "variants": [{"label": "100g", "price": 10}]}"#,
        )
        .unwrap();

        assert_eq!(draft.ratings.clone().unwrap().into_text(), "4.5");
        assert_eq!(draft.variants[0].price.clone().unwrap().into_text(), "10");
        assert!(draft.variants[0].stock.is_none());
    }

    #[test]
    fn test_non_object_drafts_rejected() {
        for content in ["[1, 2]", r#"["Honey", "Raw honey"]"#, "\"Honey\"", "42", "null"] {
            let err = DraftFile::parse(content).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::Configuration { .. }), "{}", content);
        }
        assert!(DraftFile::parse("{}").unwrap().variants.is_empty());
    }

    #[tokio::test]
    async fn test_load_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("front.png"), [1u8, 2, 3]).unwrap();
        let draft_path = dir.path().join("honey.json");
        std::fs::write(
            &draft_path,
            r#"{
                "name": "Honey",
                "description": "Raw",
                "category": "Pantry",
                "variants": [
                    {"label": "100g", "price": "10", "originalPrice": 12, "stock": 5},
                    {"label": "500g", "price": 40, "images": ["front.png"]}
                ]
            }"#,
        )
        .unwrap();

        let draft = DraftFile::load(&draft_path).await.unwrap();
        let form = form();
        let reports = draft.apply_to(&form).await.unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_complete());

        let payload = form.preview_payload();
        assert_eq!(payload.name, "Honey");
        assert_eq!(payload.variants.len(), 2);
        assert_eq!(payload.variants[0].original_price, 12.0);
        assert_eq!(payload.variants[1].price, 40.0);
        assert_eq!(payload.variants[1].images, vec!["front.png"]);
    }

    #[tokio::test]
    async fn test_missing_image_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let draft_path = dir.path().join("draft.json");
        std::fs::write(&draft_path, r#"{"variants": [{"images": ["nope.png"]}]}"#).unwrap();

        let draft = DraftFile::load(&draft_path).await.unwrap();
        let reports = draft.apply_to(&form()).await.unwrap();

        assert_eq!(reports.len(), 1);
        let failure = &reports[0].failed[0];
        assert_eq!(failure.file_name, "nope.png");
        assert!(failure.error.message.contains("nope.png"));
        assert_eq!(failure.error.causes.len(), 1);
    }

    #[tokio::test]
    async fn test_disk_image_reports_size_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label.png");
        std::fs::write(&path, [0x89u8, b'P', b'N', b'G']).unwrap();

        let image = DiskImage::new(path);
        assert_eq!(image.name(), "label.png");
        assert_eq!(image.size().await, Some(4));
        assert_eq!(image.read().await.unwrap().len(), 4);
        assert_eq!(DiskImage::new(dir.path().join("gone.png")).size().await, None);
    }
}
