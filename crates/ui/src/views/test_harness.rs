use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::quiz::QuizEvent;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, QuizStore};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::store::QuizHandle;
use crate::views::{MenuView, QuizView, ResultsView};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Menu,
    Quiz,
    Results,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    store: QuizStore,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    let store = props.store.clone();
    use_context_provider(move || QuizHandle::new(Signal::new(store), ctx.quiz_loop()));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Menu => rsx! { MenuView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Results => rsx! { ResultsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Mount `view` over `storage` after playing `events` through the quiz loop.
pub async fn setup_view_harness(
    view: ViewKind,
    storage: Storage,
    events: Vec<QuizEvent>,
) -> ViewHarness {
    let services = AppServices::from_storage(&storage, Clock::fixed(fixed_now()), 20);
    let quiz_loop = services.quiz_loop();
    let mut store = quiz_loop.new_store();
    for event in events {
        quiz_loop
            .dispatch(&mut store, event)
            .await
            .expect("event applies");
    }

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(services),
            store,
            view,
        },
    );
    ViewHarness { dom }
}
