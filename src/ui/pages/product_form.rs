// src/ui/pages/product_form.rs - Product creation page

use std::sync::Arc;

use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::api::HttpSubmitter;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::form::{
    DataUrlReader, ImageId, ImageSource, ProductDraft, ProductField, ProductForm, VariantDraft,
    VariantField, VariantId,
};
use crate::platform;
use crate::ui::components::{Button, FormField};
use crate::ui::state::{use_app_dispatch, AppAction, UiNotifier};

/// Form bound to the page's draft signal, shared with child components
/// through context
pub type PageForm = ProductForm<Signal<ProductDraft>>;

/// A file from the picker, read through the platform file engine
struct PickedFile {
    engine: Arc<dyn FileEngine>,
    name: String,
}

#[async_trait::async_trait(?Send)]
impl ImageSource for PickedFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn picker_filtered(&self) -> bool {
        true
    }

    async fn size(&self) -> Option<u64> {
        self.engine.file_size(&self.name).await
    }

    async fn read(&self) -> Result<Arc<[u8]>> {
        self.engine
            .read_file(&self.name)
            .await
            .map(Into::into)
            .ok_or_else(|| Error::decode(&self.name, "The picked file could not be read"))
    }
}

const INPUT_CLASS: &str = "w-full px-3 py-2 border border-gray-300 rounded-md shadow-sm focus:outline-none focus:ring-2 focus:ring-blue-500 focus:border-blue-500";

/// Product form page component
#[component]
pub fn ProductFormPage() -> Element {
    let config = use_context::<AppConfig>();
    let dispatch = use_app_dispatch();
    let draft = use_signal(ProductDraft::new);
    let mut pending = use_signal(|| None::<CancellationToken>);

    let product_form = use_hook(|| {
        let submitter = HttpSubmitter::from_config(platform::create_network(), &config.api);
        tracing::debug!(url = submitter.url(), "Product form ready");

        ProductForm::new(
            draft,
            Arc::new(DataUrlReader),
            Arc::new(submitter),
            Arc::new(UiNotifier::new(dispatch)),
        )
        .with_upload_config(config.upload.clone())
        .with_strict_numbers(config.form.strict_numbers)
    });
    use_context_provider(|| product_form.clone());

    let (name, category, description, removable, variants) = {
        let state = draft.read();
        let variants: Vec<(VariantId, Arc<VariantDraft>)> = state
            .variants()
            .iter()
            .map(|(id, variant)| (id, Arc::clone(variant)))
            .collect();
        (
            state.name.clone(),
            state.category.clone(),
            state.description.clone(),
            state.variant_count() > 1,
            variants,
        )
    };
    let is_submitting = pending.read().is_some();

    let add_form = product_form.clone();
    let submit_form = product_form.clone();

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if pending.peek().is_some() {
            return;
        }

        let form = submit_form.clone();
        let token = CancellationToken::new();
        pending.set(Some(token.clone()));
        dispatch.call(AppAction::SetLoading(true));

        spawn(async move {
            if let Err(error) = form.submit(token).await {
                tracing::debug!(error = %error, "Product was not saved");
            }
            pending.set(None);
            dispatch.call(AppAction::SetLoading(false));
        });
    };

    rsx! {
        div {
            class: "min-h-screen bg-gray-50 py-8 px-4",
            div {
                class: "max-w-4xl mx-auto",
                div {
                    class: "bg-white rounded-xl shadow-md overflow-hidden",
                    div {
                        class: "p-6 bg-gradient-to-r from-blue-500 to-indigo-600 text-white",
                        h2 {
                            class: "text-2xl font-bold",
                            "{config.ui.title}"
                        }
                        p {
                            class: "text-blue-100",
                            "Fill in the details below to create a new product"
                        }
                    }

                    form {
                        class: "p-6 space-y-6",
                        onsubmit: onsubmit,

                        // Product information
                        div {
                            class: "space-y-4",
                            h3 {
                                class: "text-lg font-semibold text-gray-700 border-b pb-2",
                                "Product Information"
                            }
                            div {
                                class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                                ProductInput {
                                    field: ProductField::Name,
                                    label: "Product Name".to_string(),
                                    value: name,
                                }
                                ProductInput {
                                    field: ProductField::Category,
                                    label: "Category".to_string(),
                                    value: category,
                                }
                            }
                            ProductInput {
                                field: ProductField::Description,
                                label: "Description".to_string(),
                                value: description,
                                multiline: true,
                            }
                        }

                        // Variants
                        div {
                            class: "space-y-6",
                            div {
                                class: "flex justify-between items-center",
                                h3 {
                                    class: "text-lg font-semibold text-gray-700",
                                    "Product Variants"
                                }
                                Button {
                                    size: "sm".to_string(),
                                    onclick: move |_: MouseEvent| {
                                        add_form.add_variant();
                                    },
                                    svg {
                                        class: "-ml-0.5 mr-2 h-4 w-4",
                                        xmlns: "http://www.w3.org/2000/svg",
                                        view_box: "0 0 20 20",
                                        fill: "currentColor",
                                        path {
                                            fill_rule: "evenodd",
                                            d: "M10 5a1 1 0 011 1v3h3a1 1 0 110 2h-3v3a1 1 0 11-2 0v-3H6a1 1 0 110-2h3V6a1 1 0 011-1z",
                                            clip_rule: "evenodd"
                                        }
                                    }
                                    "Add Variant"
                                }
                            }

                            for (index, (variant_id, variant)) in variants.into_iter().enumerate() {
                                VariantCard {
                                    key: "{variant_id}",
                                    index: index,
                                    variant_id: variant_id,
                                    variant: variant,
                                    removable: removable,
                                }
                            }
                        }

                        div {
                            class: "flex justify-end items-center gap-3 pt-4",
                            if is_submitting {
                                Button {
                                    variant: "secondary".to_string(),
                                    onclick: move |_: MouseEvent| {
                                        if let Some(token) = pending.peek().as_ref() {
                                            token.cancel();
                                        }
                                    },
                                    "Cancel"
                                }
                            }
                            Button {
                                button_type: "submit".to_string(),
                                variant: "success".to_string(),
                                size: "lg".to_string(),
                                loading: is_submitting,
                                "Save Product"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ProductInput(
    field: ProductField,
    label: String,
    value: String,
    #[props(default = false)] multiline: bool,
) -> Element {
    let form = use_context::<PageForm>();
    let id = field.as_str();

    let control = if multiline {
        rsx! {
            textarea {
                id: id,
                name: id,
                rows: "3",
                value: "{value}",
                required: true,
                class: INPUT_CLASS,
                oninput: move |evt: FormEvent| form.update_product_field(field, evt.value()),
            }
        }
    } else {
        rsx! {
            input {
                id: id,
                r#type: "text",
                name: id,
                value: "{value}",
                required: true,
                class: INPUT_CLASS,
                oninput: move |evt: FormEvent| form.update_product_field(field, evt.value()),
            }
        }
    };

    rsx! {
        FormField {
            label: label,
            id: id.to_string(),
            {control}
        }
    }
}

#[component]
fn VariantCard(
    index: usize,
    variant_id: VariantId,
    variant: Arc<VariantDraft>,
    removable: bool,
) -> Element {
    let form = use_context::<PageForm>();
    let accept = use_context::<AppConfig>().upload.accept;
    let number = index + 1;

    let images: Vec<(ImageId, String, String)> = variant
        .images
        .iter()
        .map(|(id, image)| (id, image.preview.clone(), image.name.clone()))
        .collect();

    let remove_form = form.clone();
    let upload_form = form.clone();

    let onupload = move |evt: FormEvent| {
        let Some(engine) = evt.files() else {
            return;
        };
        let form = upload_form.clone();
        let files: Vec<PickedFile> = engine
            .files()
            .into_iter()
            .map(|name| PickedFile {
                engine: Arc::clone(&engine),
                name,
            })
            .collect();

        spawn(async move {
            let report = form.upload_images_by_id(variant_id, files).await;
            if !report.is_complete() {
                tracing::debug!(variant = %variant_id, "Upload batch finished with problems");
            }
        });
    };

    rsx! {
        div {
            class: "border border-gray-200 rounded-lg p-4 shadow-sm",
            div {
                class: "flex justify-between items-center mb-4",
                h4 {
                    class: "font-medium text-gray-800",
                    "Variant #{number}"
                }
                if removable {
                    button {
                        r#type: "button",
                        class: "text-red-500 hover:text-red-700",
                        title: "Remove variant",
                        onclick: move |_| {
                            remove_form.remove_variant_by_id(variant_id);
                        },
                        svg {
                            class: "h-5 w-5",
                            xmlns: "http://www.w3.org/2000/svg",
                            view_box: "0 0 20 20",
                            fill: "currentColor",
                            path {
                                fill_rule: "evenodd",
                                d: "M9 2a1 1 0 00-.894.553L7.382 4H4a1 1 0 000 2v10a2 2 0 002 2h8a2 2 0 002-2V6a1 1 0 100-2h-3.382l-.724-1.447A1 1 0 0011 2H9zM7 8a1 1 0 012 0v6a1 1 0 11-2 0V8zm5-1a1 1 0 00-1 1v6a1 1 0 102 0V8a1 1 0 00-1-1z",
                                clip_rule: "evenodd"
                            }
                        }
                    }
                }
            }

            div {
                class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                VariantInput {
                    variant_id: variant_id,
                    field: VariantField::Label,
                    label: "Label".to_string(),
                    value: variant.label.clone(),
                    input_type: "text".to_string(),
                    placeholder: "e.g. 100g, 500ml".to_string(),
                }
                VariantInput {
                    variant_id: variant_id,
                    field: VariantField::Price,
                    label: "Price".to_string(),
                    value: variant.price.clone(),
                }
                VariantInput {
                    variant_id: variant_id,
                    field: VariantField::OriginalPrice,
                    label: "Original Price".to_string(),
                    value: variant.original_price.clone(),
                }
                VariantInput {
                    variant_id: variant_id,
                    field: VariantField::Stock,
                    label: "Stock".to_string(),
                    value: variant.stock.clone(),
                }
                VariantInput {
                    variant_id: variant_id,
                    field: VariantField::Discount,
                    label: "Discount (%)".to_string(),
                    value: variant.discount.clone(),
                }
            }

            div {
                class: "mt-4 space-y-1",
                label {
                    class: "block text-sm font-medium text-gray-700",
                    "Images"
                }
                div {
                    class: "flex items-center gap-2",
                    label {
                        class: "flex flex-col items-center justify-center w-full px-4 py-6 bg-white text-blue-500 rounded-lg border-2 border-dashed border-gray-300 cursor-pointer hover:bg-gray-50",
                        svg {
                            class: "h-8 w-8",
                            xmlns: "http://www.w3.org/2000/svg",
                            fill: "none",
                            view_box: "0 0 24 24",
                            stroke: "currentColor",
                            path {
                                stroke_linecap: "round",
                                stroke_linejoin: "round",
                                stroke_width: "2",
                                d: "M4 16l4.586-4.586a2 2 0 012.828 0L16 16m-2-2l1.586-1.586a2 2 0 012.828 0L20 14m-6-6h.01M6 20h12a2 2 0 002-2V6a2 2 0 00-2-2H6a2 2 0 00-2 2v12a2 2 0 002 2z"
                            }
                        }
                        span {
                            class: "mt-2 text-sm font-medium",
                            "Upload Images"
                        }
                        input {
                            r#type: "file",
                            multiple: true,
                            accept: "{accept}",
                            class: "hidden",
                            onchange: onupload,
                        }
                    }
                }

                if !images.is_empty() {
                    div {
                        class: "mt-4 grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 gap-3",
                        for (image_id, preview, name) in images {
                            ImageThumb {
                                key: "{image_id}",
                                variant_id: variant_id,
                                image_id: image_id,
                                preview: preview,
                                name: name,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn VariantInput(
    variant_id: VariantId,
    field: VariantField,
    label: String,
    value: String,
    #[props(default = "number".to_string())] input_type: String,
    #[props(default = "".to_string())] placeholder: String,
) -> Element {
    let form = use_context::<PageForm>();
    let id = format!("{}-{}", field, variant_id);

    rsx! {
        FormField {
            label: label,
            id: id.clone(),
            input {
                id: "{id}",
                r#type: "{input_type}",
                name: field.as_str(),
                placeholder: "{placeholder}",
                value: "{value}",
                required: true,
                class: INPUT_CLASS,
                oninput: move |evt: FormEvent| {
                    form.update_variant_field_by_id(variant_id, field, evt.value());
                },
            }
        }
    }
}

#[component]
fn ImageThumb(variant_id: VariantId, image_id: ImageId, preview: String, name: String) -> Element {
    let form = use_context::<PageForm>();

    rsx! {
        div {
            class: "relative group",
            img {
                src: "{preview}",
                alt: "{name}",
                class: "w-full h-32 object-cover rounded-lg border border-gray-200",
            }
            button {
                r#type: "button",
                class: "absolute top-2 right-2 bg-red-500 text-white rounded-full w-6 h-6 flex items-center justify-center opacity-0 group-hover:opacity-100 transition-opacity",
                onclick: move |_| {
                    form.remove_image_by_id(variant_id, image_id);
                },
                svg {
                    class: "h-4 w-4",
                    xmlns: "http://www.w3.org/2000/svg",
                    view_box: "0 0 20 20",
                    fill: "currentColor",
                    path {
                        fill_rule: "evenodd",
                        d: "M4.293 4.293a1 1 0 011.414 0L10 8.586l4.293-4.293a1 1 0 111.414 1.414L11.414 10l4.293 4.293a1 1 0 01-1.414 1.414L10 11.414l-4.293 4.293a1 1 0 01-1.414-1.414L8.586 10 4.293 5.707a1 1 0 010-1.414z",
                        clip_rule: "evenodd"
                    }
                }
            }
            div {
                class: "text-xs text-gray-500 truncate mt-1",
                "{name}"
            }
        }
    }
}
