use dioxus::prelude::*;
use quiz_core::model::DateRange;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    LEADERBOARD_REFRESH, LeaderboardRowVm, SubjectOptionVm, map_leaderboard_rows,
    subject_for_value, subject_options,
};

/// Top scores with a subject filter. Reloads on its own every 30 seconds.
#[component]
pub fn LeaderboardPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut subject = use_signal(String::new);
    let mut tick = use_signal(|| 0_u64);

    use_future(move || async move {
        loop {
            tokio::time::sleep(LEADERBOARD_REFRESH).await;
            *tick.write() += 1;
        }
    });

    let leaderboard = ctx.leaderboard();
    let resource = use_resource(move || {
        let leaderboard = leaderboard.clone();
        let _tick = tick();
        let filter = subject_for_value(&subject.read());
        async move {
            let entries = leaderboard
                .top(filter.as_ref())
                .await
                .map_err(|_| ViewError::Leaderboard)?;
            Ok::<_, ViewError>(map_leaderboard_rows(&entries))
        }
    });

    let subjects = ctx.subjects();
    let options_resource = use_resource(move || {
        let subjects = subjects.clone();
        async move {
            let tags = subjects
                .subjects(DateRange::All)
                .await
                .map_err(|_| ViewError::Subjects)?;
            Ok::<_, ViewError>(subject_options(&tags))
        }
    });
    let options: Vec<SubjectOptionVm> = match view_state_from_resource(&options_resource) {
        ViewState::Ready(options) => options,
        _ => subject_options(&[]),
    };

    let state = view_state_from_resource(&resource);

    rsx! {
        section { class: "panel leaderboard",
            h2 { "Leaderboard" }
            select {
                class: "subject-select",
                value: "{subject}",
                onchange: move |evt: FormEvent| subject.set(evt.value()),
                for opt in options {
                    option { key: "{opt.value}", value: "{opt.value}", "{opt.label}" }
                }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(rows) if rows.is_empty() => rsx! {
                    p { class: "muted", "No scores submitted yet." }
                },
                ViewState::Ready(rows) => rsx! {
                    LeaderboardTable { rows }
                },
            }
        }
    }
}

#[component]
fn LeaderboardTable(rows: Vec<LeaderboardRowVm>) -> Element {
    rsx! {
        table { class: "scores",
            thead {
                tr {
                    th { "Rank" }
                    th { "Player" }
                    th { class: "num", "Score" }
                    th { class: "num", "Date" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.rank}",
                        td { "{row.badge} {row.rank}" }
                        td { "{row.username}" }
                        td { class: "num", "{row.score}" }
                        td { class: "num muted", "{row.when}" }
                    }
                }
            }
        }
    }
}
