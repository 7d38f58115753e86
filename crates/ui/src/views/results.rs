use dioxus::prelude::*;
use quiz_core::quiz::QuizEvent;
use tracing::debug;

use crate::context::AppContext;
use crate::routes::{Route, use_phase_redirect};
use crate::store::use_quiz;
use crate::vm::{AnswerCardVm, SubmitStatus, map_results};

#[component]
pub fn ResultsView() -> Element {
    use_phase_redirect(Route::Results {});
    let ctx = use_context::<AppContext>();
    let quiz = use_quiz();
    let store = quiz.store();

    let mut username = use_signal(String::new);
    let mut status = use_signal(SubmitStatus::default);

    let leaderboard = ctx.leaderboard();
    {
        let leaderboard = leaderboard.clone();
        use_future(move || {
            let leaderboard = leaderboard.clone();
            async move {
                let Some(saved) = leaderboard.last_username().await else {
                    return;
                };
                if username.peek().is_empty() {
                    username.set(saved);
                }
            }
        });
    }

    let vm = map_results(store.read().state());

    let submit = use_callback(move |()| {
        if !status.peek().can_submit() {
            return;
        }
        let name = username.read().clone();
        let (score, tag) = {
            let store = store.read();
            let state = store.state();
            (state.score(), state.profile().tag.clone())
        };
        let leaderboard = leaderboard.clone();
        status.set(SubmitStatus::Submitting);
        spawn(async move {
            let next = match leaderboard.submit(&name, score, &tag).await {
                Ok(_) => SubmitStatus::Submitted,
                Err(e) => SubmitStatus::Failed(e.to_string()),
            };
            status.set(next);
        });
    });

    let restart = use_callback(move |()| {
        if let Err(e) = quiz.dispatch(QuizEvent::Restart) {
            debug!(target: "quiz.ui", error = %e, "restart rejected");
        }
    });

    let current_status = status();
    let can_submit = current_status.can_submit();
    let status_class = if current_status == SubmitStatus::Submitted {
        "status good"
    } else {
        "status bad"
    };

    rsx! {
        div { class: "page results",
            section { class: "panel summary",
                h2 { "Quiz Results" }
                if let Some(email) = vm.email.as_deref() {
                    p { "Email: {email}" }
                }
                p { "Score: {vm.score}" }
                p { "Correct: {vm.correct} / {vm.answered}" }
                p { "Total Time: {vm.total_time}" }
                p { class: "muted", "Subject: {vm.subject}" }

                label { r#for: "username", "Enter username to submit score:" }
                input {
                    id: "username",
                    r#type: "text",
                    placeholder: "Enter username",
                    value: "{username}",
                    disabled: !can_submit,
                    oninput: move |evt: FormEvent| username.set(evt.value()),
                }
                button {
                    id: "submit-score",
                    class: "primary",
                    disabled: !can_submit,
                    onclick: move |_| submit.call(()),
                    "Submit Score"
                }
                if let Some(message) = current_status.message() {
                    p { class: "{status_class}", "{message}" }
                }
                button {
                    id: "restart",
                    class: "secondary",
                    onclick: move |_| restart.call(()),
                    "Restart Quiz"
                }
            }
            section { class: "review",
                h2 { "Answer Review" }
                for (index, card) in vm.cards.into_iter().enumerate() {
                    AnswerCardView { key: "{index}", card }
                }
            }
        }
    }
}

#[component]
fn AnswerCardView(card: AnswerCardVm) -> Element {
    rsx! {
        article { class: "panel answer-card",
            div { class: "answer-body",
                h3 { "{card.heading}" }
                p { "{card.summary}" }
                p { class: if card.correct { "good" } else { "bad" }, "{card.statement}" }
                p { "{card.outcome}" }
                if card.points > 0 {
                    p { class: "points", "+{card.points} points" }
                }
                p { class: "muted small", "{card.context}" }
                if let Some(url) = card.article_url.as_deref() {
                    a { href: "{url}", target: "_blank", rel: "noopener noreferrer", "Read the full article" }
                }
            }
            if let Some(src) = card.image_url.as_deref() {
                img { class: "thumb", src: "{src}", alt: "{card.heading}" }
            }
        }
    }
}
