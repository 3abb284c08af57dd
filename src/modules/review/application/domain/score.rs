use std::fmt;

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

/// A review score, always within `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Score must be between 1 and 10.")]
pub struct ScoreOutOfRange;

impl Score {
    pub fn new(value: i64) -> Result<Self, ScoreOutOfRange> {
        if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
            // Range check above keeps the cast lossless.
            Ok(Self(value as i16))
        } else {
            Err(ScoreOutOfRange)
        }
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
