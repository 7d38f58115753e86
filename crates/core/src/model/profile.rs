use chrono::{DateTime, Months, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::player::EmailAddress;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("unknown date range: {0}")]
    UnknownDateRange(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── DATE RANGE ───────────────────────────────────────────────────────────────
//

/// How far back the question pool reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateRange {
    #[default]
    All,
    Month,
    ThreeMonths,
    Year,
}

impl DateRange {
    pub const OPTIONS: [DateRange; 4] = [
        DateRange::Month,
        DateRange::ThreeMonths,
        DateRange::Year,
        DateRange::All,
    ];

    /// Absolute lower bound on the publish date, or `None` for `All`.
    #[must_use]
    pub fn lower_bound(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months = match self {
            Self::All => return None,
            Self::Month => 1,
            Self::ThreeMonths => 3,
            Self::Year => 12,
        };
        now.checked_sub_months(Months::new(months))
    }

    /// Stable identifier, also used in persisted settings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Month => "month",
            Self::ThreeMonths => "3months",
            Self::Year => "year",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Month => "This Month",
            Self::ThreeMonths => "Last 3 Months",
            Self::Year => "This Year",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "month" => Ok(Self::Month),
            "3months" => Ok(Self::ThreeMonths),
            "year" => Ok(Self::Year),
            other => Err(ProfileError::UnknownDateRange(other.to_string())),
        }
    }
}

//
// ─── TAG FILTER ───────────────────────────────────────────────────────────────
//

/// Case-insensitive substring filter on a question's tag field.
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagFilter(Option<String>);

impl TagFilter {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn matches(&self, tags: &str) -> bool {
        match &self.0 {
            None => true,
            Some(needle) => tags.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Player-selected difficulty. Carried on the profile; scoring ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ProfileError::UnknownDifficulty(other.to_string())),
        }
    }
}

//
// ─── PROFILE ──────────────────────────────────────────────────────────────────
//

/// Who is playing and which slice of the dataset they asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub email: Option<EmailAddress>,
    pub difficulty: Difficulty,
    pub tag: TagFilter,
    pub date_range: DateRange,
}

impl UserProfile {
    #[must_use]
    pub fn new(email: Option<EmailAddress>, tag: TagFilter, date_range: DateRange) -> Self {
        Self {
            email,
            difficulty: Difficulty::default(),
            tag,
            date_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::TimeZone;

    #[test]
    fn lower_bound_steps_back_calendar_months() {
        let now = Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap();
        assert_eq!(DateRange::All.lower_bound(now), None);
        assert_eq!(
            DateRange::Month.lower_bound(now),
            Some(Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DateRange::ThreeMonths.lower_bound(now),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap())
        );
        assert_eq!(
            DateRange::Year.lower_bound(now),
            Some(Utc.with_ymd_and_hms(2023, 5, 31, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn date_range_round_trips_through_str() {
        for range in DateRange::OPTIONS {
            assert_eq!(range.as_str().parse::<DateRange>().unwrap(), range);
        }
        assert!("decade".parse::<DateRange>().is_err());
    }

    #[test]
    fn tag_filter_is_case_insensitive_substring() {
        let filter = TagFilter::new(" politics ");
        assert_eq!(filter.as_str(), Some("politics"));
        assert!(filter.matches("['Politics', 'Elections']"));
        assert!(!filter.matches("['Science']"));
        assert!(TagFilter::new("   ").is_any());
        assert!(TagFilter::any().matches(""));
    }

    #[test]
    fn default_profile_plays_everything() {
        let profile = UserProfile::default();
        assert!(profile.email.is_none());
        assert_eq!(profile.difficulty, Difficulty::Easy);
        assert!(profile.tag.is_any());
        assert_eq!(profile.date_range.lower_bound(fixed_now()), None);
    }
}
