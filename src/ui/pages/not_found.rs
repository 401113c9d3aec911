// src/ui/pages/not_found.rs - 404 Not Found page

use dioxus::prelude::*;
#[allow(unused_imports)]
use dioxus_router::prelude::*;

use crate::ui::router::Route;

/// 404 Not Found page component
#[component]
pub fn NotFound(#[props(default = "".to_string())] path: String) -> Element {
    let navigator = use_navigator();

    rsx! {
        div {
            class: "min-h-screen bg-white px-4 py-16 sm:px-6 sm:py-24 md:grid md:place-items-center lg:px-8",
            div {
                class: "max-w-max mx-auto",
                main {
                    class: "sm:flex",
                    p {
                        class: "text-4xl font-extrabold text-blue-600 sm:text-5xl",
                        "404"
                    }
                    div {
                        class: "sm:ml-6",
                        div {
                            class: "sm:border-l sm:border-gray-200 sm:pl-6",
                            h1 {
                                class: "text-4xl font-extrabold text-gray-900 tracking-tight sm:text-5xl",
                                "Page not found"
                            }
                            p {
                                class: "mt-1 text-base text-gray-500",
                                "There is no product screen at this address."
                            }
                            if !path.is_empty() {
                                p {
                                    class: "mt-2 text-sm text-gray-400 font-mono bg-gray-100 px-2 py-1 rounded",
                                    "Path: /{path}"
                                }
                            }
                        }
                        div {
                            class: "mt-10 flex space-x-3 sm:border-l sm:border-transparent sm:pl-6",
                            Link {
                                to: Route::Home {},
                                class: "inline-flex items-center px-4 py-2 border border-transparent text-sm font-medium rounded-md shadow-sm text-white bg-blue-600 hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-blue-500",
                                "Back to the product form"
                            }
                            button {
                                r#type: "button",
                                class: "inline-flex items-center px-4 py-2 border border-gray-300 shadow-sm text-sm font-medium rounded-md text-gray-700 bg-white hover:bg-gray-50 focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-blue-500",
                                onclick: move |_| navigator.go_back(),
                                "Go back"
                            }
                        }
                    }
                }
            }
        }
    }
}
