// src/ui/app.rs - Main application component with routing

use dioxus::prelude::*;
#[allow(unused_imports)]
use dioxus_router::prelude::*;

use crate::config::AppConfig;
use crate::ui::{components::{LoadingBar, NotificationCenter}, router::Route, state::AppStateProvider};

/// Main application component that sets up routing and global state.
///
/// The desktop binary hands its loaded configuration in through the root
/// context; the web build falls back to defaults.
#[component]
pub fn App() -> Element {
    let config = use_hook(|| try_consume_context::<AppConfig>().unwrap_or_default());
    use_context_provider(|| config);

    rsx! {
        AppStateProvider {
            div {
                class: "min-h-screen bg-gray-50",
                LoadingBar {}
                NotificationCenter {}
                Router::<Route> {}
            }
        }
    }
}
