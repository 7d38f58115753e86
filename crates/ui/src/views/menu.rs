use dioxus::prelude::*;
use quiz_core::model::{DateRange, TagFilter, UserProfile};
use quiz_core::quiz::QuizEvent;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::{Route, use_phase_redirect};
use crate::store::use_quiz;
use crate::views::{LeaderboardPanel, ViewError, ViewState, view_state_from_resource};
use crate::vm::subject_options;

const START_FAILED: &str = "An error occurred while starting the quiz. Please try again.";

#[component]
pub fn MenuView() -> Element {
    use_phase_redirect(Route::Menu {});
    let ctx = use_context::<AppContext>();
    let quiz = use_quiz();

    let mut email = use_signal(String::new);
    let mut tag = use_signal(String::new);
    let mut date_range = use_signal(DateRange::default);
    let mut form_error = use_signal(|| None::<String>);
    let mut starting = use_signal(|| false);

    let email_capture = ctx.email_capture();
    {
        let email_capture = email_capture.clone();
        use_future(move || {
            let email_capture = email_capture.clone();
            async move {
                let Some(saved) = email_capture.remembered().await else {
                    return;
                };
                if email.peek().is_empty() {
                    email.set(saved.to_string());
                }
            }
        });
    }

    let subjects = ctx.subjects();
    let subjects_resource = use_resource(move || {
        let subjects = subjects.clone();
        let range = date_range();
        async move {
            let tags = subjects
                .subjects(range)
                .await
                .map_err(|_| ViewError::Subjects)?;
            Ok::<_, ViewError>(subject_options(&tags))
        }
    });
    let subject_state = view_state_from_resource(&subjects_resource);
    let (options, subjects_error) = match subject_state {
        ViewState::Ready(options) => (options, None),
        ViewState::Error(err) => (subject_options(&[]), Some(err.message())),
        ViewState::Idle | ViewState::Loading => (subject_options(&[]), None),
    };

    let start = use_callback(move |()| {
        if starting() {
            return;
        }
        let raw = email.read().clone();
        let filter = TagFilter::new(tag.read().as_str());
        let range = date_range();
        let email_capture = email_capture.clone();
        let quiz = quiz.clone();
        starting.set(true);
        spawn(async move {
            match email_capture.capture(&raw).await {
                Ok(address) => {
                    form_error.set(None);
                    let profile = UserProfile::new(Some(address), filter, range);
                    if let Err(e) = quiz.dispatch(QuizEvent::Start(profile)) {
                        warn!(target: "quiz.ui", error = %e, "start rejected");
                        form_error.set(Some(START_FAILED.to_string()));
                    }
                }
                Err(e) => form_error.set(Some(e.to_string())),
            }
            starting.set(false);
        });
    });

    rsx! {
        div { class: "page menu",
            section {
                class: "panel start",
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        start.call(());
                    }
                },
                label { r#for: "email", "Email Address" }
                input {
                    id: "email",
                    r#type: "email",
                    placeholder: "Enter your email address",
                    value: "{email}",
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                label { r#for: "subject", "Select Quiz Subject" }
                select {
                    id: "subject",
                    value: "{tag}",
                    onchange: move |evt: FormEvent| tag.set(evt.value()),
                    for opt in options {
                        option { key: "{opt.value}", value: "{opt.value}", "{opt.label}" }
                    }
                }
                if let Some(message) = subjects_error {
                    p { class: "error small", "{message}" }
                }

                label { "Select Date Range" }
                div { class: "ranges",
                    for range in DateRange::OPTIONS {
                        button {
                            key: "{range.as_str()}",
                            class: if date_range() == range { "range active" } else { "range" },
                            onclick: move |_| date_range.set(range),
                            "{range.label()}"
                        }
                    }
                }

                button {
                    id: "start-quiz",
                    class: "primary",
                    disabled: starting(),
                    onclick: move |_| start.call(()),
                    if starting() { "Starting..." } else { "Start Quiz" }
                }
                p { class: "hint", "Press ENTER to start the quiz" }
                if let Some(message) = form_error() {
                    p { class: "error", role: "alert", "{message}" }
                }
            }
            LeaderboardPanel {}
        }
    }
}
