use std::sync::Arc;

use quiz_core::model::EmailAddress;
use storage::repository::{PreferenceKey, PreferencesRepository, SubscriberRepository};
use tracing::{info, warn};

use crate::Clock;
use crate::error::EmailCaptureError;

/// Validates and records the player's email before a quiz starts.
#[derive(Clone)]
pub struct EmailCaptureService {
    clock: Clock,
    subscribers: Arc<dyn SubscriberRepository>,
    preferences: Arc<dyn PreferencesRepository>,
}

impl EmailCaptureService {
    #[must_use]
    pub fn new(
        clock: Clock,
        subscribers: Arc<dyn SubscriberRepository>,
        preferences: Arc<dyn PreferencesRepository>,
    ) -> Self {
        Self {
            clock,
            subscribers,
            preferences,
        }
    }

    /// Validate `raw`, remember it locally and upsert it upstream.
    ///
    /// # Errors
    ///
    /// Returns `EmailCaptureError::Validation` for a malformed address (nothing
    /// is stored) and `EmailCaptureError::Storage` if the upsert fails.
    pub async fn capture(&self, raw: &str) -> Result<EmailAddress, EmailCaptureError> {
        let email = EmailAddress::parse(raw)?;

        if let Err(e) = self
            .preferences
            .set_preference(PreferenceKey::Email, email.as_str())
            .await
        {
            warn!(target: "quiz.email", error = %e, "could not remember email");
        }

        self.subscribers
            .upsert_email(&email, self.clock.now())
            .await
            .map_err(|e| {
                warn!(target: "quiz.email", error = %e, "email upsert failed");
                EmailCaptureError::Storage(e)
            })?;
        info!(target: "quiz.email", "email captured");
        Ok(email)
    }

    /// Last email entered on this machine, if it is still valid.
    pub async fn remembered(&self) -> Option<EmailAddress> {
        match self.preferences.get_preference(PreferenceKey::Email).await {
            Ok(value) => value.and_then(|raw| EmailAddress::parse(raw).ok()),
            Err(e) => {
                warn!(target: "quiz.email", error = %e, "could not read saved email");
                None
            }
        }
    }
}
