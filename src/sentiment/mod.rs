pub mod comprehend;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use comprehend::ComprehendAnalyzer;

/// Confidence scores for the four sentiment labels. They are non-negative but
/// need not sum to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
    pub mixed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SentimentLabel> for Mood {
    fn from(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Mood::Happy,
            SentimentLabel::Negative => Mood::Sad,
            SentimentLabel::Neutral | SentimentLabel::Mixed => Mood::Neutral,
        }
    }
}

impl SentimentScores {
    pub fn new(positive: f32, negative: f32, neutral: f32, mixed: f32) -> Self {
        Self {
            positive,
            negative,
            neutral,
            mixed,
        }
    }

    fn entries(&self) -> [(SentimentLabel, f32); 4] {
        [
            (SentimentLabel::Positive, self.positive),
            (SentimentLabel::Negative, self.negative),
            (SentimentLabel::Neutral, self.neutral),
            (SentimentLabel::Mixed, self.mixed),
        ]
    }

    /// The label whose score is strictly greater than every other score and
    /// than zero. Ties for the top score and all-zero vectors yield `None`.
    pub fn dominant(&self) -> Option<SentimentLabel> {
        let mut best: Option<(SentimentLabel, f32)> = None;
        let mut tied = false;

        for (label, score) in self.entries() {
            if !(score > 0.0) {
                continue;
            }
            match best {
                Some((_, top)) if score > top => {
                    best = Some((label, score));
                    tied = false;
                }
                Some((_, top)) if score == top => tied = true,
                Some(_) => {}
                None => best = Some((label, score)),
            }
        }

        match best {
            Some((label, _)) if !tied => Some(label),
            _ => None,
        }
    }

    /// Mood of the dominant label, falling back to neutral when no label dominates.
    pub fn mood(&self) -> Mood {
        self.dominant().map(Mood::from).unwrap_or(Mood::Neutral)
    }
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn detect(&self, text: &str) -> Result<SentimentScores>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_maximum_picks_its_label() {
        assert_eq!(SentimentScores::new(0.9, 0.05, 0.03, 0.02).mood(), Mood::Happy);
        assert_eq!(SentimentScores::new(0.1, 0.6, 0.2, 0.1).mood(), Mood::Sad);
        assert_eq!(SentimentScores::new(0.1, 0.1, 0.7, 0.1).mood(), Mood::Neutral);
        assert_eq!(SentimentScores::new(0.2, 0.2, 0.1, 0.5).mood(), Mood::Neutral);
        assert_eq!(
            SentimentScores::new(0.0, 0.0, 0.0, 0.4).dominant(),
            Some(SentimentLabel::Mixed)
        );
    }

    #[test]
    fn strict_maximum_ignores_the_other_scores() {
        for others in [0.0_f32, 0.1, 0.49] {
            let scores = SentimentScores::new(others, 0.5, others, others);
            assert_eq!(scores.dominant(), Some(SentimentLabel::Negative));
            assert_eq!(scores.mood(), Mood::Sad);
        }
    }

    #[test]
    fn equal_positive_scores_fall_back_to_neutral() {
        let scores = SentimentScores::new(0.25, 0.25, 0.25, 0.25);
        assert_eq!(scores.dominant(), None);
        assert_eq!(scores.mood(), Mood::Neutral);
    }

    #[test]
    fn tie_at_the_top_falls_back_to_neutral() {
        let scores = SentimentScores::new(0.4, 0.4, 0.1, 0.1);
        assert_eq!(scores.dominant(), None);
        assert_eq!(scores.mood(), Mood::Neutral);
    }

    #[test]
    fn all_zero_falls_back_to_neutral() {
        let scores = SentimentScores::default();
        assert_eq!(scores.dominant(), None);
        assert_eq!(scores.mood(), Mood::Neutral);
    }

    #[test]
    fn mood_words() {
        assert_eq!(Mood::Happy.to_string(), "happy");
        assert_eq!(Mood::Sad.as_str(), "sad");
    }
}
