// src/ui/router.rs
use crate::ui::pages::{NotFound as NotFoundPage, ProductFormPage};
use dioxus::prelude::*;
#[allow(unused_imports)]
use dioxus_router::prelude::*;

#[derive(Clone,Routable,Debug,PartialEq)]
#[rustfmt::skip]
pub enum Route{
    #[route("/")]
    Home{},
    #[route("/:..segments")]
    NotFound{segments:Vec<String>},
}

#[component]
pub fn Home() -> Element {
    let title = nav::route_title(&Route::Home {});

    rsx! {
        document::Title { "{title}" }
        ProductFormPage {}
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    let title = nav::route_title(&Route::NotFound { segments: segments.clone() });

    rsx! {
        document::Title { "{title}" }
        div{
            class:"min-h-screen flex items-center justify-center bg-gray-50",
            NotFoundPage{path:path}
        }
    }
}

pub mod nav {
    use super::*;

    pub fn route_title(route: &Route) -> &'static str {
        match route {
            Route::Home { .. } => "Add Product",
            Route::NotFound { .. } => "Not Found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_route_equality() {
        assert_eq!(Route::Home {}, Route::Home {});
        assert_ne!(Route::Home {}, Route::NotFound { segments: vec![] });
    }

    #[test]
    fn test_route_title() {
        assert_eq!(nav::route_title(&Route::Home {}), "Add Product");
        assert_eq!(nav::route_title(&Route::NotFound { segments: vec![] }), "Not Found");
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home {}.to_string(), "/");

        let unknown = Route::from_str("/missing/page").expect("catch-all route");
        assert_eq!(
            unknown,
            Route::NotFound {
                segments: vec!["missing".to_string(), "page".to_string()]
            }
        );
    }
}
