//! Sentiment scoring for short texts such as generated reviews and tweets,
//! backed by the VADER lexicon and rules.

use std::sync::LazyLock;

use vader_sentiment::SentimentIntensityAnalyzer;

static VADER: LazyLock<SentimentIntensityAnalyzer> =
    LazyLock::new(|| SentimentIntensityAnalyzer::new());

/// Scores text into a compound polarity in `[-1, 1]`. Text with no known
/// sentiment words scores exactly `0.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let scores = VADER.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0).clamp(-1.0, 1.0)
    }
}
