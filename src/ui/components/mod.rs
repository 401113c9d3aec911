// src/ui/components/mod.rs - Reusable UI components

use dioxus::prelude::*;

pub mod notifications;

pub use notifications::NotificationCenter;

use crate::ui::state::use_app_state;

/// Button component with consistent styling
#[component]
pub fn Button(
    #[props(default = "button".to_string())] button_type: String,
    #[props(default = "primary".to_string())] variant: String,
    #[props(default = "md".to_string())] size: String,
    #[props(default = false)] loading: bool,
    #[props(default = "".to_string())] class: String,
    #[props(default = None)] onclick: Option<Callback<MouseEvent>>,
    children: Element,
) -> Element {
    let base_classes = "inline-flex items-center border font-medium rounded-md shadow-sm focus:outline-none focus:ring-2 focus:ring-offset-2 transition-colors";

    let variant_classes = match variant.as_str() {
        "primary" => "border-transparent text-white bg-blue-600 hover:bg-blue-700 focus:ring-blue-500",
        "secondary" => "border-gray-300 text-gray-700 bg-white hover:bg-gray-50 focus:ring-blue-500",
        "success" => "border-transparent text-white bg-green-600 hover:bg-green-700 focus:ring-green-500",
        _ => "border-gray-300 text-gray-700 bg-white hover:bg-gray-50 focus:ring-blue-500",
    };

    let size_classes = match size.as_str() {
        "sm" => "px-3 py-2 text-sm leading-4",
        "lg" => "px-6 py-3 text-base",
        _ => "px-4 py-2 text-sm",
    };

    let disabled_classes = if loading {
        "opacity-50 cursor-not-allowed"
    } else {
        ""
    };

    rsx! {
        button {
            r#type: "{button_type}",
            class: format!("{} {} {} {} {}", base_classes, variant_classes, size_classes, disabled_classes, class),
            disabled: loading,
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },

            if loading {
                Spinner { size: "sm".to_string(), class: "-ml-1 mr-2".to_string() }
            }

            {children}
        }
    }
}

/// Thin bar across the top of the window while a save is in flight
#[component]
pub fn LoadingBar() -> Element {
    let state = use_app_state();

    rsx! {
        if state.is_loading {
            div {
                class: "fixed top-0 inset-x-0 z-50 h-1 bg-blue-500 animate-pulse",
                role: "progressbar",
                "aria-label": "Saving",
            }
        }
    }
}

/// Form field wrapper component
#[component]
pub fn FormField(
    #[props(default = "".to_string())] label: String,
    #[props(default = "".to_string())] id: String,
    #[props(default = "".to_string())] class: String,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: format!("space-y-1 {}", class),

            if !label.is_empty() {
                label {
                    r#for: "{id}",
                    class: "block text-sm font-medium text-gray-700",
                    "{label}"
                }
            }

            {children}
        }
    }
}

/// Loading spinner component
#[component]
pub fn Spinner(
    #[props(default = "md".to_string())] size: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let size_classes = match size.as_str() {
        "sm" => "h-4 w-4",
        "lg" => "h-8 w-8",
        _ => "h-6 w-6",
    };

    rsx! {
        svg {
            class: format!("animate-spin {} {}", size_classes, class),
            xmlns: "http://www.w3.org/2000/svg",
            fill: "none",
            view_box: "0 0 24 24",
            circle {
                class: "opacity-25",
                cx: "12",
                cy: "12",
                r: "10",
                stroke: "currentColor",
                stroke_width: "4"
            }
            path {
                class: "opacity-75",
                fill: "currentColor",
                d: "M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4zm2 5.291A7.962 7.962 0 014 12H0c0 3.042 1.135 5.824 3 7.938l3-2.647z"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_component() {
        let _button = rsx! {
            Button {
                variant: "success".to_string(),
                button_type: "submit".to_string(),
                "Save Product"
            }
        };
    }

    #[test]
    fn test_form_field_component() {
        let _field = rsx! {
            FormField {
                label: "Product Name".to_string(),
                id: "name".to_string(),
                input { id: "name" }
            }
        };
    }
}
