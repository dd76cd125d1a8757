use crate::error::{Error, Result};

pub const PLAY_SCORE: f32 = 1.0;
pub const DOWNLOAD_SCORE: f32 = 2.0;
pub const COLLECTION_SCORE: f32 = 5.0;
pub const MAX_SCORE: f32 = 10.0;

/// How many items we remember per user and event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Only the first item a user interacted with is kept, later records just bump its count.
    FirstItem,
    /// Every distinct item is kept with its own count.
    PerItem,
}

impl Default for Retention {
    fn default() -> Self {
        Retention::FirstItem
    }
}

/// Scores contributed by each kind of event, and the cap applied to their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub play_score: f32,
    pub download_score: f32,
    pub collection_score: f32,
    pub max_score: f32,
    pub retention: Retention,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            play_score: PLAY_SCORE,
            download_score: DOWNLOAD_SCORE,
            collection_score: COLLECTION_SCORE,
            max_score: MAX_SCORE,
            retention: Retention::default(),
        }
    }
}

impl ScoringConfig {

    pub fn validate(&self) -> Result<()> {
        let scores = [
            ("play_score", self.play_score),
            ("download_score", self.download_score),
            ("collection_score", self.collection_score),
        ];

        for (name, score) in scores.iter() {
            if !score.is_finite() || *score < 0.0 {
                return Err(Error::InvalidConfig(
                    format!("{} must be a non-negative number, got {}", name, score)));
            }
        }

        if !self.max_score.is_finite() || self.max_score <= 0.0 {
            return Err(Error::InvalidConfig(
                format!("max_score must be positive, got {}", self.max_score)));
        }

        Ok(())
    }

    /// Caps a raw score at `max_score`.
    #[inline]
    pub fn clamp(&self, score: f32) -> f32 {
        if score > self.max_score { self.max_score } else { score }
    }
}
