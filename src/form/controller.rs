// src/form/controller.rs - Entry points of the product form

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ProductSubmitter;
use crate::config::UploadConfig;
use crate::error::{Error, Result};
use crate::form::arena::{ImageId, VariantId};
use crate::form::image::{
    mime_from_name, sniff_mime, ImageReader, ImageSource, UploadFailure, UploadReport,
    UNKNOWN_MIME_TYPE,
};
use crate::form::model::{ImageFile, ImageUpload, ProductDraft, ProductField, VariantField};
use crate::form::notify::{NoticeLevel, Notifier};
use crate::form::payload::{validate_draft, ProductPayload};
use crate::form::reducer::{form_reducer, FormAction};
use crate::form::store::DraftCell;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Product added successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Something went wrong while adding the product.";

/// Mutation and submission API over one draft.
///
/// Positional entry points resolve indices against the state current at
/// the moment of the update and fail with a contract error when the index
/// is out of range. The `*_by_id` forms take stable ids and treat an
/// unknown id as a no-op.
pub struct ProductForm<C> {
    cell: C,
    reader: Arc<dyn ImageReader>,
    submitter: Arc<dyn ProductSubmitter>,
    notifier: Arc<dyn Notifier>,
    upload: UploadConfig,
    strict_numbers: bool,
}

impl<C: Clone> Clone for ProductForm<C> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            reader: Arc::clone(&self.reader),
            submitter: Arc::clone(&self.submitter),
            notifier: Arc::clone(&self.notifier),
            upload: self.upload.clone(),
            strict_numbers: self.strict_numbers,
        }
    }
}

impl<C> std::fmt::Debug for ProductForm<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductForm")
            .field("upload", &self.upload)
            .field("strict_numbers", &self.strict_numbers)
            .finish_non_exhaustive()
    }
}

impl<C: DraftCell> ProductForm<C> {
    pub fn new(
        cell: C,
        reader: Arc<dyn ImageReader>,
        submitter: Arc<dyn ProductSubmitter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cell,
            reader,
            submitter,
            notifier,
            upload: UploadConfig::default(),
            strict_numbers: false,
        }
    }

    pub fn with_upload_config(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_strict_numbers(mut self, strict_numbers: bool) -> Self {
        self.strict_numbers = strict_numbers;
        self
    }

    pub fn cell(&self) -> &C {
        &self.cell
    }

    pub fn snapshot(&self) -> ProductDraft {
        self.cell.snapshot()
    }

    /// Resolves an address against the current state and reduces the
    /// resulting action in the same update
    fn apply_resolved<T>(
        &self,
        operation: &str,
        resolve: impl FnOnce(&ProductDraft) -> Result<(FormAction, T)>,
    ) -> Result<T> {
        let mut outcome = Err(Error::contract(operation, "State update was not applied"));

        self.cell.apply(|state| match resolve(state) {
            Ok((action, value)) => {
                outcome = Ok(value);
                form_reducer(state, action)
            }
            Err(e) => {
                outcome = Err(e);
                state.clone()
            }
        });

        outcome
    }

    fn resolve_variant(state: &ProductDraft, operation: &str, index: usize) -> Result<VariantId> {
        state.variant_id_at(index).ok_or_else(|| {
            Error::contract(
                operation,
                format!(
                    "Variant index {} is out of range for {} variant(s)",
                    index,
                    state.variant_count()
                ),
            )
        })
    }

    pub fn update_product_field(&self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        debug!(%field, "Updating product field");
        self.cell.dispatch(FormAction::SetProductField { field, value });
    }

    /// Same as [`update_product_field`](Self::update_product_field) with
    /// the field given by its input name
    pub fn update_product_field_named(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = name.parse::<ProductField>()?;
        self.update_product_field(field, value);
        Ok(())
    }

    pub fn update_variant_field(
        &self,
        variant_index: usize,
        field: VariantField,
        value: impl Into<String>,
    ) -> Result<()> {
        let value = value.into();
        debug!(variant_index, %field, "Updating variant field");

        self.apply_resolved("update_variant_field", |state| {
            let variant = Self::resolve_variant(state, "update_variant_field", variant_index)?;
            Ok((
                FormAction::SetVariantField {
                    variant,
                    field,
                    value,
                },
                (),
            ))
        })
    }

    /// Returns false when the variant no longer exists
    pub fn update_variant_field_by_id(
        &self,
        variant: VariantId,
        field: VariantField,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let mut found = false;

        self.cell.apply(|state| {
            found = state.variant(variant).is_some();
            form_reducer(
                state,
                FormAction::SetVariantField {
                    variant,
                    field,
                    value,
                },
            )
        });

        found
    }

    /// Appends a blank variant and returns its id
    pub fn add_variant(&self) -> VariantId {
        let id = VariantId::new();
        debug!(variant = %id, "Adding variant");
        self.cell.dispatch(FormAction::AddVariant { id });
        id
    }

    /// Returns false when the variant is the only one left
    pub fn remove_variant(&self, variant_index: usize) -> Result<bool> {
        debug!(variant_index, "Removing variant");

        self.apply_resolved("remove_variant", |state| {
            let variant = Self::resolve_variant(state, "remove_variant", variant_index)?;
            let removable = state.variant_count() > 1;
            Ok((FormAction::RemoveVariant { variant }, removable))
        })
    }

    /// Returns false when the variant is unknown or the only one left
    pub fn remove_variant_by_id(&self, variant: VariantId) -> bool {
        let mut removed = false;

        self.cell.apply(|state| {
            removed = state.variant(variant).is_some() && state.variant_count() > 1;
            form_reducer(state, FormAction::RemoveVariant { variant })
        });

        removed
    }

    pub fn remove_image(&self, variant_index: usize, image_index: usize) -> Result<()> {
        debug!(variant_index, image_index, "Removing image");

        self.apply_resolved("remove_image", |state| {
            let variant = Self::resolve_variant(state, "remove_image", variant_index)?;
            let image = state
                .variant(variant)
                .and_then(|draft| draft.images.id_at(image_index))
                .ok_or_else(|| {
                    Error::contract(
                        "remove_image",
                        format!(
                            "Image index {} is out of range for variant {}",
                            image_index, variant_index
                        ),
                    )
                })?;
            Ok((FormAction::RemoveImage { variant, image }, ()))
        })
    }

    /// Returns false when either id is unknown
    pub fn remove_image_by_id(&self, variant: VariantId, image: ImageId) -> bool {
        let mut removed = false;

        self.cell.apply(|state| {
            removed = state
                .variant(variant)
                .is_some_and(|draft| draft.images.contains(image));
            form_reducer(state, FormAction::RemoveImage { variant, image })
        });

        removed
    }

    /// Reads every file of the batch concurrently and appends the previews
    /// to the variant in input order, in one update
    pub async fn upload_images<S: ImageSource>(
        &self,
        variant_index: usize,
        files: Vec<S>,
    ) -> Result<UploadReport> {
        let variant = self.cell.inspect(|state| {
            Self::resolve_variant(state, "upload_images", variant_index)
        })?;

        Ok(self.upload_images_by_id(variant, files).await)
    }

    pub async fn upload_images_by_id<S: ImageSource>(
        &self,
        variant: VariantId,
        files: Vec<S>,
    ) -> UploadReport {
        let mut report = UploadReport::default();
        if files.is_empty() {
            return report;
        }

        debug!(%variant, files = files.len(), "Reading image batch");

        let loads = files.iter().map(|source| async move {
            (source.name().to_string(), self.load_image(source).await)
        });

        let mut images = Vec::new();
        for (file_name, result) in join_all(loads).await {
            match result {
                Ok(upload) => images.push((ImageId::new(), upload)),
                Err(error) => {
                    warn!(file = %file_name, error = %error, "Skipping image");
                    report.failed.push(UploadFailure { file_name, error });
                }
            }
        }

        if !images.is_empty() {
            let ids: Vec<ImageId> = images.iter().map(|(id, _)| *id).collect();
            let mut present = false;

            self.cell.apply(|state| {
                present = state.variant(variant).is_some();
                form_reducer(state, FormAction::AppendImages { variant, images })
            });

            if present {
                report.appended = ids;
            } else {
                warn!(%variant, images = ids.len(), "Variant removed before its images loaded");
                report.variant_missing = true;
            }
        }

        if report.variant_missing {
            self.notifier.notify(
                NoticeLevel::Warning,
                "Images were not added",
                "The variant was removed before its images finished loading.",
            );
        }

        if !report.failed.is_empty() {
            self.notifier.notify(
                NoticeLevel::Warning,
                "Some images were not added",
                &report.summary(),
            );
        }

        report
    }

    /// Checks the limits that need no bytes, then reads, identifies and
    /// previews one file
    async fn load_image<S: ImageSource>(&self, source: &S) -> Result<ImageUpload> {
        let name = source.name();
        if let Some(size) = source.size().await {
            check_size(&self.upload, name, size)?;
        }

        let declared = source
            .mime_type()
            .map(str::trim)
            .filter(|mime| !mime.is_empty() && *mime != UNKNOWN_MIME_TYPE)
            .unwrap_or_else(|| mime_from_name(name))
            .to_string();
        let identified = declared != UNKNOWN_MIME_TYPE;
        if identified {
            check_type(&self.upload, name, &declared)?;
        }

        let bytes = source.read().await?;
        check_size(&self.upload, name, bytes.len() as u64)?;

        let mime_type = if identified {
            declared
        } else {
            match sniff_mime(&bytes) {
                Some(sniffed) => {
                    check_type(&self.upload, name, sniffed)?;
                    sniffed.to_string()
                }
                None => {
                    if !source.picker_filtered() {
                        check_type(&self.upload, name, UNKNOWN_MIME_TYPE)?;
                    }
                    UNKNOWN_MIME_TYPE.to_string()
                }
            }
        };

        let file = ImageFile::new(name, bytes).with_mime_type(mime_type);
        let preview = self.reader.read_data_url(&file).await?;
        Ok(ImageUpload::new(file, preview))
    }

    /// Normalized payload for the current state
    pub fn preview_payload(&self) -> ProductPayload {
        self.cell.inspect(ProductPayload::from_draft)
    }

    /// Posts the current draft. On success the form is reset; on failure or
    /// cancellation the draft is left as it was.
    pub async fn submit(&self, cancel: CancellationToken) -> Result<Value> {
        let draft = self.cell.snapshot();

        let issues = validate_draft(&draft, self.strict_numbers);
        if let Some(first) = issues.first() {
            let message = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            let rules = issues
                .iter()
                .map(|issue| format!("{:?}", issue.kind()))
                .collect();

            self.notifier
                .notify(NoticeLevel::Error, "Check the form", &message);
            return Err(Error::validation(first.path(), rules, message).source("product_form"));
        }

        let payload = ProductPayload::from_draft(&draft);
        info!(
            name = %payload.name,
            variants = payload.variants.len(),
            "Submitting product"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::cancelled("Product submission was cancelled")
                .source("product_form")),
            result = self.submitter.submit(&payload) => result,
        };

        match result {
            Ok(reply) => {
                info!("Product submitted");
                self.notifier
                    .notify(NoticeLevel::Success, "Saved", SUBMIT_SUCCESS_MESSAGE);
                self.cell.dispatch(FormAction::Reset);
                Ok(reply)
            }
            Err(error) if error.is_cancelled() => {
                debug!("Submission cancelled");
                Err(error)
            }
            Err(error) => {
                warn!(error = %error, "Product submission failed");
                self.notifier
                    .notify(NoticeLevel::Error, "Not saved", SUBMIT_FAILURE_MESSAGE);
                Err(error)
            }
        }
    }
}

fn check_size(config: &UploadConfig, name: &str, size: u64) -> Result<()> {
    if size > config.max_file_size {
        return Err(Error::validation(
            name,
            vec!["max_file_size".to_string()],
            format!(
                "{} is {} bytes, the limit is {}",
                name, size, config.max_file_size
            ),
        ));
    }

    Ok(())
}

fn check_type(config: &UploadConfig, name: &str, mime_type: &str) -> Result<()> {
    if !config.accepts(mime_type) {
        return Err(Error::validation(
            name,
            vec!["accept".to_string()],
            format!("{} is not an accepted file type ({})", name, mime_type),
        ));
    }

    Ok(())
}
