use std::time::Duration;

use dioxus::prelude::*;
use quiz_core::model::Verdict;
use quiz_core::quiz::QuizEvent;
use tracing::debug;

use crate::routes::{Route, use_phase_redirect};
use crate::store::{QuizHandle, use_quiz};
use crate::vm::{
    FeedbackVm, NoticeAction, NoticeVm, QuestionVm, QuizStage, is_answered, map_quiz,
};

fn send(quiz: &QuizHandle, event: QuizEvent) {
    let name = event.name();
    if let Err(e) = quiz.dispatch(event) {
        debug!(target: "quiz.ui", event = name, error = %e, "ignored quiz action");
    }
}

#[component]
pub fn QuizView() -> Element {
    use_phase_redirect(Route::Quiz {});
    let quiz = use_quiz();
    let store = quiz.store();
    let mut elapsed = use_signal(|| 0_u32);

    // Ticks only while a question is waiting for an answer. Dropped with the view.
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let waiting = {
                let store = store.read();
                let state = store.state();
                state.current_question().is_some() && !is_answered(state)
            };
            if waiting {
                *elapsed.write() += 1;
            }
        }
    });

    let vm = map_quiz(&store.read());
    let has_notice = vm.notice.is_some();

    let answer = {
        let quiz = quiz.clone();
        use_callback(move |verdict: Verdict| {
            if is_answered(store.read().state()) {
                return;
            }
            let elapsed_secs = elapsed();
            send(
                &quiz,
                QuizEvent::Answer {
                    verdict,
                    elapsed_secs,
                },
            );
        })
    };
    let advance = {
        let quiz = quiz.clone();
        use_callback(move |()| {
            elapsed.set(0);
            send(&quiz, QuizEvent::Advance);
        })
    };
    let finish = {
        let quiz = quiz.clone();
        use_callback(move |()| send(&quiz, QuizEvent::Finish))
    };
    let restart = {
        let quiz = quiz.clone();
        use_callback(move |()| {
            elapsed.set(0);
            send(&quiz, QuizEvent::Restart);
        })
    };
    let retry = {
        let quiz = quiz.clone();
        use_callback(move |()| quiz.retry())
    };

    rsx! {
        div { class: "page quiz",
            header { class: "quiz-header",
                h2 { "Question {vm.question_number}" }
                span { class: "timer", "Time: {elapsed}s" }
            }
            div { class: "status",
                p { class: "score", "Current Score: {vm.score}" }
                div { class: "lives",
                    for (slot, full) in vm.hearts.iter().copied().enumerate() {
                        span {
                            key: "{slot}",
                            class: if full { "heart full" } else { "heart empty" },
                            if full { "♥" } else { "♡" }
                        }
                    }
                }
            }
            if let Some(notice) = vm.notice.clone() {
                Notice { notice, on_retry: retry, on_menu: restart }
            }
            match vm.stage.clone() {
                QuizStage::Loading if has_notice => rsx! {},
                QuizStage::Loading => rsx! {
                    p { class: "muted", "Loading questions..." }
                },
                QuizStage::Question(question) => rsx! {
                    QuestionCard { question, on_answer: answer }
                },
                QuizStage::Feedback(feedback) => rsx! {
                    FeedbackCard { feedback, score: vm.score, on_continue: advance }
                },
                QuizStage::OutOfQuestions => rsx! {
                    div { class: "panel",
                        p { "You have answered every question available for these filters." }
                        button { class: "primary", onclick: move |_| finish.call(()), "View Results" }
                    }
                },
            }
            div { class: "quiz-footer",
                button { class: "secondary", onclick: move |_| restart.call(()), "Cancel Quiz" }
            }
        }
    }
}

#[component]
fn Notice(notice: NoticeVm, on_retry: Callback<()>, on_menu: Callback<()>) -> Element {
    rsx! {
        div { class: "notice", role: "alert",
            p { "{notice.message}" }
            match notice.action {
                NoticeAction::Retry => rsx! {
                    button { onclick: move |_| on_retry.call(()), "Retry" }
                },
                NoticeAction::BackToMenu => rsx! {
                    button { onclick: move |_| on_menu.call(()), "Back to Menu" }
                },
                NoticeAction::None => rsx! {},
            }
        }
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_answer: Callback<Verdict>) -> Element {
    rsx! {
        article { class: "panel question",
            if let Some(src) = question.image_url.as_deref() {
                img { class: "claim-image", src: "{src}", alt: "Question" }
            }
            p { class: "claim", "{question.summary}" }
            if let Some(date) = question.fact_date.as_deref() {
                p { class: "muted small", "Fact Date: {date}" }
            }
            div { class: "verdicts",
                button {
                    id: "answer-fake",
                    class: "fake",
                    onclick: move |_| on_answer.call(Verdict::Fake),
                    "Fake"
                }
                button {
                    id: "answer-real",
                    class: "real",
                    onclick: move |_| on_answer.call(Verdict::Real),
                    "Real"
                }
            }
        }
    }
}

#[component]
fn FeedbackCard(feedback: FeedbackVm, score: u32, on_continue: Callback<()>) -> Element {
    rsx! {
        article { class: if feedback.correct { "panel feedback correct" } else { "panel feedback incorrect" },
            h3 { "Answer" }
            p { "The statement is {feedback.statement}." }
            p { "{feedback.context}" }
            if feedback.correct {
                p { class: "verdict good", "Correct!" }
                p { class: "points", "You scored {feedback.points} points!" }
            } else {
                p { class: "verdict bad", "Incorrect!" }
            }
            p { class: "total", "Total Score: {score}" }
            if let Some(url) = feedback.article_url.as_deref() {
                a { href: "{url}", target: "_blank", rel: "noopener noreferrer", "Read the full article" }
            }
            button {
                id: "continue",
                class: "primary",
                onclick: move |_| on_continue.call(()),
                "{feedback.continue_label}"
            }
        }
    }
}
