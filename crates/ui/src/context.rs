use std::sync::Arc;

use services::{
    AppServices, EmailCaptureService, LeaderboardService, QuizLoopService, SubjectCatalogService,
};

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn subjects(&self) -> Arc<SubjectCatalogService>;
    fn leaderboard(&self) -> Arc<LeaderboardService>;
    fn email_capture(&self) -> Arc<EmailCaptureService>;
}

impl UiApp for AppServices {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        AppServices::quiz_loop(self)
    }

    fn subjects(&self) -> Arc<SubjectCatalogService> {
        AppServices::subjects(self)
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        AppServices::leaderboard(self)
    }

    fn email_capture(&self) -> Arc<EmailCaptureService> {
        AppServices::email_capture(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    subjects: Arc<SubjectCatalogService>,
    leaderboard: Arc<LeaderboardService>,
    email_capture: Arc<EmailCaptureService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            subjects: app.subjects(),
            leaderboard: app.leaderboard(),
            email_capture: app.email_capture(),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn subjects(&self) -> Arc<SubjectCatalogService> {
        Arc::clone(&self.subjects)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn email_capture(&self) -> Arc<EmailCaptureService> {
        Arc::clone(&self.email_capture)
    }
}

// Provided by the binary (`crates/app`) through `LaunchBuilder::with_context`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
