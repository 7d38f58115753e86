mod answer;
mod ids;
mod leaderboard;
mod player;
mod profile;
mod question;
mod rating;
mod tag;

pub use ids::{LeaderboardEntryId, ParseIdError, QuestionId};

pub use answer::AnswerCard;
pub use leaderboard::{LeaderboardEntry, NewScore, Subject, rank_entries};
pub use player::{EmailAddress, Username, ValidationError};
pub use profile::{DateRange, Difficulty, ProfileError, TagFilter, UserProfile};
pub use question::{Question, QuestionDraft, QuestionError};
pub use rating::{FAKE_RATINGS, REAL_RATINGS, RatingCategory, Verdict};
pub use tag::{MIN_SUBJECT_OCCURRENCES, TagCount, clean_tag, count_tags};
