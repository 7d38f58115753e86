use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::ids::LeaderboardEntryId;
use crate::model::player::Username;
use crate::model::profile::TagFilter;

/// Leaderboard bucket a score is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    /// Subject used when the session had no tag filter.
    pub const ALL_SUBJECTS: &'static str = "All Subjects";

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn all() -> Self {
        Self(Self::ALL_SUBJECTS.to_string())
    }

    /// The subject a finished session is submitted under.
    #[must_use]
    pub fn for_filter(filter: &TagFilter) -> Self {
        filter.as_str().map_or_else(Self::all, Self::new)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Score about to be appended to the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScore {
    pub username: Username,
    pub score: u32,
    pub subject: Subject,
}

/// A submitted score as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub id: LeaderboardEntryId,
    pub username: Username,
    pub score: u32,
    pub subject: Subject,
    pub created_at: DateTime<Utc>,
}

/// Orders entries the way the store ranks them: score desc, then oldest first.
pub fn rank_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}
