use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::AppContext;
use crate::routes::Route;
use crate::store::use_quiz_provider;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    use_quiz_provider(ctx.quiz_loop());

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Fake News Quiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
