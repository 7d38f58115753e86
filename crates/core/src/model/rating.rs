use std::fmt;

//
// ─── LEXICON ──────────────────────────────────────────────────────────────────
//

/// Rating labels that count as a fabricated or misleading claim.
pub const FAKE_RATINGS: &[&str] = &[
    "Unfounded",
    "Fake",
    "Unproven",
    "False",
    "Originated as Satire",
    "Mixture",
    "Misattributed",
    "Miscaptioned",
    "Legend",
    "Mostly False",
    "Outdated",
    "Scam",
    "Labeled Satire",
];

/// Rating labels that count as a genuine claim.
pub const REAL_RATINGS: &[&str] = &["True", "Correct Attribution", "Mostly True", "Legit"];

//
// ─── CATEGORY ─────────────────────────────────────────────────────────────────
//

/// Veracity bucket a free-text rating label falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingCategory {
    Fake,
    Real,
    /// Labels outside the lexicon. Never served to players.
    Ambiguous,
}

impl RatingCategory {
    /// Classify a rating label. Matching is exact after trimming.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        let label = label.trim();
        if FAKE_RATINGS.contains(&label) {
            Self::Fake
        } else if REAL_RATINGS.contains(&label) {
            Self::Real
        } else {
            Self::Ambiguous
        }
    }

    #[must_use]
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::Ambiguous)
    }

    /// Whether the player's verdict is right for this category.
    ///
    /// Always false for `Ambiguous`.
    #[must_use]
    pub fn accepts(self, verdict: Verdict) -> bool {
        matches!(
            (self, verdict),
            (Self::Fake, Verdict::Fake) | (Self::Real, Verdict::Real)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fake => "fake",
            Self::Real => "real",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for RatingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── VERDICT ──────────────────────────────────────────────────────────────────
//

/// The player's call on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Fake,
    Real,
}

impl Verdict {
    /// Maps the boolean "is this real?" answer onto a verdict.
    #[must_use]
    pub fn from_is_real(is_real: bool) -> Self {
        if is_real { Self::Real } else { Self::Fake }
    }

    #[must_use]
    pub fn is_real(self) -> bool {
        matches!(self, Self::Real)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fake => "Fake",
            Self::Real => "Real",
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fake_label_classifies_as_fake() {
        for label in FAKE_RATINGS {
            assert_eq!(RatingCategory::classify(label), RatingCategory::Fake, "{label}");
        }
    }

    #[test]
    fn every_real_label_classifies_as_real() {
        for label in REAL_RATINGS {
            assert_eq!(RatingCategory::classify(label), RatingCategory::Real, "{label}");
        }
    }

    #[test]
    fn classification_trims_but_is_case_sensitive() {
        assert_eq!(RatingCategory::classify("  Mostly True "), RatingCategory::Real);
        assert_eq!(RatingCategory::classify("mostly true"), RatingCategory::Ambiguous);
        assert_eq!(RatingCategory::classify("Research In Progress"), RatingCategory::Ambiguous);
        assert_eq!(RatingCategory::classify(""), RatingCategory::Ambiguous);
    }

    #[test]
    fn accepts_matches_verdict_to_category() {
        assert!(RatingCategory::Fake.accepts(Verdict::Fake));
        assert!(!RatingCategory::Fake.accepts(Verdict::Real));
        assert!(RatingCategory::Real.accepts(Verdict::Real));
        assert!(!RatingCategory::Ambiguous.accepts(Verdict::Real));
        assert!(!RatingCategory::Ambiguous.accepts(Verdict::Fake));
    }

    #[test]
    fn verdict_from_bool() {
        assert_eq!(Verdict::from_is_real(true), Verdict::Real);
        assert_eq!(Verdict::from_is_real(false), Verdict::Fake);
        assert!(Verdict::Real.is_real());
    }
}
