use std::sync::Arc;

use quiz_core::model::{LeaderboardEntry, NewScore, Subject, TagFilter, Username};
use storage::repository::{LeaderboardRepository, PreferenceKey, PreferencesRepository};
use tracing::{info, warn};

use crate::Clock;
use crate::error::LeaderboardError;

/// Entries shown on the leaderboard.
pub const LEADERBOARD_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct LeaderboardService {
    clock: Clock,
    scores: Arc<dyn LeaderboardRepository>,
    preferences: Arc<dyn PreferencesRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        scores: Arc<dyn LeaderboardRepository>,
        preferences: Arc<dyn PreferencesRepository>,
    ) -> Self {
        Self {
            clock,
            scores,
            preferences,
        }
    }

    /// Top scores overall, or within one subject.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Load` if the store cannot be read.
    pub async fn top(
        &self,
        subject: Option<&Subject>,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.scores
            .top_scores(LEADERBOARD_LIMIT, subject)
            .await
            .map_err(|e| {
                warn!(target: "quiz.leaderboard", error = %e, "leaderboard load failed");
                LeaderboardError::Load(e)
            })
    }

    /// Submit a finished session's score under the session's subject.
    ///
    /// The username is remembered locally on success.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Validation` for a blank name and
    /// `LeaderboardError::Submit` if the insert fails.
    pub async fn submit(
        &self,
        username: &str,
        score: u32,
        tag: &TagFilter,
    ) -> Result<NewScore, LeaderboardError> {
        let username = Username::new(username)?;
        let entry = NewScore {
            username,
            score,
            subject: Subject::for_filter(tag),
        };

        self.scores
            .insert_score(&entry, self.clock.now())
            .await
            .map_err(|e| {
                warn!(target: "quiz.leaderboard", error = %e, "score submit failed");
                LeaderboardError::Submit(e)
            })?;
        info!(
            target: "quiz.leaderboard",
            username = %entry.username,
            score,
            subject = %entry.subject,
            "score submitted"
        );

        if let Err(e) = self
            .preferences
            .set_preference(PreferenceKey::Username, entry.username.as_str())
            .await
        {
            warn!(target: "quiz.leaderboard", error = %e, "could not remember username");
        }
        Ok(entry)
    }

    /// Username used for the last successful submit, if any.
    pub async fn last_username(&self) -> Option<String> {
        match self.preferences.get_preference(PreferenceKey::Username).await {
            Ok(value) => value,
            Err(e) => {
                warn!(target: "quiz.leaderboard", error = %e, "could not read saved username");
                None
            }
        }
    }
}
