// src/ui/components/notifications.rs - Toast stack for form notices

use dioxus::prelude::*;
use uuid::Uuid;

use crate::ui::state::use_notifications;
use crate::ui::{Notification, NotificationType};

/// Renders every pending notification in the top-right corner
#[component]
pub fn NotificationCenter() -> Element {
    let (notifications, remove) = use_notifications();

    rsx! {
        div {
            class: "fixed top-4 right-4 z-50 w-80 space-y-3",
            "aria-live": "polite",
            for notification in notifications {
                Toast {
                    key: "{notification.id}",
                    notification: notification.clone(),
                    on_dismiss: remove,
                }
            }
        }
    }
}

#[component]
fn Toast(notification: Notification, on_dismiss: Callback<Uuid>) -> Element {
    let id = notification.id;
    let icon = match notification.notification_type {
        NotificationType::Success => "✔",
        NotificationType::Warning => "!",
        NotificationType::Error => "✖",
        NotificationType::Info => "i",
    };

    rsx! {
        div {
            class: format!(
                "rounded-md border-l-4 p-4 shadow-md {}",
                notification.notification_type.css_class()
            ),
            role: "alert",
            div {
                class: "flex items-start",
                span {
                    class: "flex-shrink-0 font-bold mr-3",
                    "{icon}"
                }
                div {
                    class: "flex-1",
                    p {
                        class: "text-sm font-medium",
                        "{notification.title}"
                    }
                    p {
                        class: "mt-1 text-sm",
                        "{notification.message}"
                    }
                }
                button {
                    r#type: "button",
                    class: "ml-3 text-sm opacity-70 hover:opacity-100",
                    onclick: move |_| on_dismiss.call(id),
                    span {
                        class: "sr-only",
                        "Dismiss"
                    }
                    "×"
                }
            }
        }
    }
}
