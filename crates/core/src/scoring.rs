//! Points awarded for a single answer.

/// Points for any correct answer.
pub const BASE_POINTS: u32 = 500;

/// Answers faster than this earn a speed bonus.
pub const BONUS_WINDOW_SECS: u32 = 30;

/// Bonus per whole second left in the window.
pub const BONUS_POINTS_PER_SEC: u32 = 10;

/// Score one answer.
///
/// Incorrect answers earn nothing. Correct answers earn `BASE_POINTS` plus
/// `BONUS_POINTS_PER_SEC` for each second under `BONUS_WINDOW_SECS`; slower
/// answers still earn the base.
#[must_use]
pub fn score(correct: bool, elapsed_secs: u32) -> u32 {
    if !correct {
        return 0;
    }
    let remaining = BONUS_WINDOW_SECS.saturating_sub(elapsed_secs);
    BASE_POINTS + remaining * BONUS_POINTS_PER_SEC
}
