// src/form/reducer.rs - Pure state transitions of the product form

use crate::form::arena::{ImageId, VariantId};
use crate::form::model::{ImageUpload, ProductDraft, ProductField, VariantDraft, VariantField};

/// Every change the form can undergo
#[derive(Debug, Clone)]
pub enum FormAction {
    SetProductField {
        field: ProductField,
        value: String,
    },
    SetVariantField {
        variant: VariantId,
        field: VariantField,
        value: String,
    },
    AddVariant {
        id: VariantId,
    },
    RemoveVariant {
        variant: VariantId,
    },
    /// One finished upload batch, already in input order
    AppendImages {
        variant: VariantId,
        images: Vec<(ImageId, ImageUpload)>,
    },
    RemoveImage {
        variant: VariantId,
        image: ImageId,
    },
    Reset,
}

impl FormAction {
    pub fn add_variant() -> Self {
        Self::AddVariant {
            id: VariantId::new(),
        }
    }
}

/// Computes the next form state. `state` is never modified; variants that
/// the action does not touch are shared with the previous state.
pub fn form_reducer(state: &ProductDraft, action: FormAction) -> ProductDraft {
    let mut next = state.clone();

    match action {
        FormAction::SetProductField { field, value } => {
            *next.field_mut(field) = value;
        }
        FormAction::SetVariantField {
            variant,
            field,
            value,
        } => {
            if !next
                .variants
                .update(variant, |current| current.with_field(field, value))
            {
                tracing::debug!(%variant, %field, "Ignoring edit for unknown variant");
            }
        }
        FormAction::AddVariant { id } => {
            next.variants.push(id, VariantDraft::default());
        }
        FormAction::RemoveVariant { variant } => {
            if next.variants.len() <= 1 {
                tracing::debug!(%variant, "Refusing to remove the last variant");
            } else if next.variants.remove(variant).is_none() {
                tracing::debug!(%variant, "Ignoring removal of unknown variant");
            }
        }
        FormAction::AppendImages { variant, images } => {
            if images.is_empty() {
                return next;
            }

            let appended = next.variants.update(variant, |current| {
                let mut updated = current.clone();
                for (id, image) in images {
                    updated.images.push(id, image);
                }
                updated
            });

            if !appended {
                tracing::debug!(%variant, "Dropping images for a removed variant");
            }
        }
        FormAction::RemoveImage { variant, image } => {
            let removed = next.variants.update(variant, |current| {
                let mut updated = current.clone();
                updated.images.remove(image);
                updated
            });

            if !removed {
                tracing::debug!(%variant, %image, "Ignoring image removal for unknown variant");
            }
        }
        FormAction::Reset => {
            next = ProductDraft::new();
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::model::ImageFile;
    use std::sync::Arc;

    fn image(name: &str) -> (ImageId, ImageUpload) {
        let file = ImageFile::new(name, name.as_bytes().to_vec());
        (ImageId::new(), ImageUpload::new(file, format!("data:{}", name)))
    }

    fn image_names(draft: &ProductDraft, variant: VariantId) -> Vec<String> {
        draft
            .variant(variant)
            .unwrap()
            .images
            .values()
            .map(|image| image.name.clone())
            .collect()
    }

    #[test]
    fn test_set_product_field() {
        let draft = ProductDraft::new();
        let next = form_reducer(
            &draft,
            FormAction::SetProductField {
                field: ProductField::Name,
                value: "Honey".to_string(),
            },
        );

        assert_eq!(next.name, "Honey");
        assert!(draft.name.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_variants() {
        let mut draft = ProductDraft::new();
        let first = draft.variant_id_at(0).unwrap();
        draft = form_reducer(
            &draft,
            FormAction::SetVariantField {
                variant: first,
                field: VariantField::Label,
                value: "100g".to_string(),
            },
        );
        draft = form_reducer(&draft, FormAction::add_variant());
        let before = draft.clone();

        let added = FormAction::add_variant();
        let FormAction::AddVariant { id } = added else {
            unreachable!()
        };
        let grown = form_reducer(&draft, added);
        assert_eq!(grown.variant_count(), 3);
        assert_eq!(grown.variant_id_at(2), Some(id));

        let shrunk = form_reducer(&grown, FormAction::RemoveVariant { variant: id });
        assert_eq!(shrunk, before);
    }

    #[test]
    fn test_last_variant_cannot_be_removed() {
        let draft = ProductDraft::new();
        let only = draft.variant_id_at(0).unwrap();

        let next = form_reducer(&draft, FormAction::RemoveVariant { variant: only });

        assert_eq!(next.variant_count(), 1);
        assert_eq!(next, draft);
    }

    #[test]
    fn test_edit_shares_untouched_variants() {
        let mut draft = ProductDraft::new();
        for _ in 0..3 {
            draft = form_reducer(&draft, FormAction::add_variant());
        }
        let target = draft.variant_id_at(2).unwrap();

        let next = form_reducer(
            &draft,
            FormAction::SetVariantField {
                variant: target,
                field: VariantField::Price,
                value: "9.99".to_string(),
            },
        );

        for index in 0..4 {
            let shared = Arc::ptr_eq(
                draft.variant_at(index).unwrap(),
                next.variant_at(index).unwrap(),
            );
            assert_eq!(shared, index != 2, "variant {}", index);
        }
        assert_eq!(next.variant_at(2).unwrap().price, "9.99");
    }

    #[test]
    fn test_removal_shifts_later_variants() {
        let mut draft = ProductDraft::new();
        draft = form_reducer(&draft, FormAction::add_variant());
        draft = form_reducer(&draft, FormAction::add_variant());
        let ids: Vec<_> = draft.variants().ids().collect();

        let next = form_reducer(&draft, FormAction::RemoveVariant { variant: ids[1] });

        assert_eq!(next.variant_id_at(0), Some(ids[0]));
        assert_eq!(next.variant_id_at(1), Some(ids[2]));
        assert_eq!(next.variant_id_at(2), None);
    }

    #[test]
    fn test_append_and_remove_images() {
        let draft = ProductDraft::new();
        let variant = draft.variant_id_at(0).unwrap();
        let batch = vec![image("a.png"), image("b.png"), image("c.png")];
        let b_id = batch[1].0;

        let next = form_reducer(
            &draft,
            FormAction::AppendImages {
                variant,
                images: batch,
            },
        );
        assert_eq!(image_names(&next, variant), vec!["a.png", "b.png", "c.png"]);

        let next = form_reducer(&next, FormAction::RemoveImage { variant, image: b_id });
        assert_eq!(image_names(&next, variant), vec!["a.png", "c.png"]);
    }

    #[test]
    fn test_images_for_removed_variant_are_dropped() {
        let mut draft = ProductDraft::new();
        draft = form_reducer(&draft, FormAction::add_variant());
        let gone = draft.variant_id_at(1).unwrap();
        draft = form_reducer(&draft, FormAction::RemoveVariant { variant: gone });

        let next = form_reducer(
            &draft,
            FormAction::AppendImages {
                variant: gone,
                images: vec![image("late.png")],
            },
        );

        assert_eq!(next, draft);
        assert_eq!(next.variant_at(0).unwrap().image_count(), 0);
    }

    #[test]
    fn test_reset_returns_blank_form() {
        let mut draft = ProductDraft::new();
        draft = form_reducer(
            &draft,
            FormAction::SetProductField {
                field: ProductField::Category,
                value: "Pantry".to_string(),
            },
        );
        draft = form_reducer(&draft, FormAction::add_variant());

        let next = form_reducer(&draft, FormAction::Reset);
        assert!(next.is_pristine());
    }
}
