use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};
use quiz_core::quiz::GamePhase;

use crate::store::use_quiz;
use crate::views::{MenuView, QuizView, ResultsView};

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", MenuView)] Menu {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/results", ResultsView)] Results {},
}

/// The screen that belongs to a phase.
#[must_use]
pub fn route_for_phase(phase: GamePhase) -> Route {
    match phase {
        GamePhase::Menu => Route::Menu {},
        GamePhase::Quiz => Route::Quiz {},
        GamePhase::Results => Route::Results {},
    }
}

/// Where to go instead of `here`, if `here` does not match the phase.
#[must_use]
pub fn redirect_for(here: &Route, phase: GamePhase) -> Option<Route> {
    let expected = route_for_phase(phase);
    (*here != expected).then_some(expected)
}

/// Keep the current screen in step with the session phase.
pub fn use_phase_redirect(here: Route) {
    let store = use_quiz().store();
    let navigator = use_navigator();
    use_effect(move || {
        let phase = store.read().state().phase();
        if let Some(target) = redirect_for(&here, phase) {
            navigator.replace(target);
        }
    });
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "masthead",
                h1 { "Fake News Quiz" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
            footer { class: "credits",
                p {
                    "Powered by "
                    a { href: "https://www.snopes.com/", target: "_blank", "Snopes" }
                }
            }
        }
    }
}
