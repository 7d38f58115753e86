use std::time::Duration;

use quiz_core::model::{LeaderboardEntry, Subject, TagCount};

use crate::vm::time_fmt::format_score_time;

/// How often the leaderboard panel reloads.
pub const LEADERBOARD_REFRESH: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub rank: usize,
    pub badge: &'static str,
    pub username: String,
    pub score: u32,
    pub when: String,
}

/// One entry of a subject dropdown. An empty value means no filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectOptionVm {
    pub value: String,
    pub label: String,
}

#[must_use]
pub fn rank_badge(rank: usize) -> &'static str {
    match rank {
        1 => "🏆",
        2 => "🥈",
        3 => "🥉",
        _ => "",
    }
}

/// Rows in the order the store returned them, ranked from 1.
#[must_use]
pub fn map_leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRowVm> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardRowVm {
            rank: index + 1,
            badge: rank_badge(index + 1),
            username: entry.username.to_string(),
            score: entry.score,
            when: format_score_time(entry.created_at),
        })
        .collect()
}

/// "All Subjects" followed by each catalog tag with its count.
#[must_use]
pub fn subject_options(tags: &[TagCount]) -> Vec<SubjectOptionVm> {
    let mut options = vec![SubjectOptionVm {
        value: String::new(),
        label: Subject::ALL_SUBJECTS.to_string(),
    }];
    options.extend(tags.iter().map(|tag| SubjectOptionVm {
        value: tag.tag.clone(),
        label: format!("{} ({})", tag.tag, tag.count),
    }));
    options
}

/// Leaderboard filter for a dropdown value.
#[must_use]
pub fn subject_for_value(value: &str) -> Option<Subject> {
    let value = value.trim();
    (!value.is_empty()).then(|| Subject::new(value))
}
