mod leaderboard_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;

pub use leaderboard_vm::{
    LEADERBOARD_REFRESH, LeaderboardRowVm, SubjectOptionVm, map_leaderboard_rows, rank_badge,
    subject_for_value, subject_options,
};
pub use quiz_vm::{
    FeedbackVm, NoticeAction, NoticeVm, QuestionVm, QuizStage, QuizVm, hearts, is_answered,
    map_quiz,
};
pub use results_vm::{AnswerCardVm, ResultsVm, SubmitStatus, map_answer_card, map_results};
pub use time_fmt::{format_elapsed, format_fact_date, format_score_time};
