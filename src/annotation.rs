use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    llm::ChatClient,
    models::{GeneratedReview, GeneratedTweet, ScoredText},
    sentiment::SentimentAnalyzer,
};

pub const REVIEW_PROMPT: &str = "You are a movie critic. Generate exactly 3 short, distinct movie reviews for the movie specified by the user. Separate each review with the '||' delimiter. Do not number them. Return only the movie reviews, with no extra text before or after the reviews.";

pub const TWEET_PROMPT: &str = "You are a social media simulator. Generate exactly 5 short, distinct tweets about the actor specified by the user, as if from different Twitter users. Include hashtags. Separate each tweet with the '||' delimiter. Return only the tweets, with no extra text before or after the tweets.";

pub const REVIEW_TEMPERATURE: f32 = 0.8;
pub const TWEET_TEMPERATURE: f32 = 1.0;

const DELIMITER: &str = "||";

/// Generates synthetic reviews and tweets and attaches a sentiment score to
/// each. Generation is best effort: any failure yields an empty list.
#[derive(Clone)]
pub struct AnnotationService {
    client: Arc<dyn ChatClient>,
    analyzer: SentimentAnalyzer,
}

impl AnnotationService {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client, analyzer: SentimentAnalyzer::new() }
    }

    pub async fn reviews_for_movie(&self, title: &str) -> Vec<GeneratedReview> {
        self.generate("review", REVIEW_PROMPT, title, REVIEW_TEMPERATURE).await
    }

    pub async fn tweets_for_actor(&self, name: &str) -> Vec<GeneratedTweet> {
        self.generate("tweet", TWEET_PROMPT, name, TWEET_TEMPERATURE).await
    }

    async fn generate(
        &self,
        kind: &'static str,
        prompt: &str,
        subject: &str,
        temperature: f32,
    ) -> Vec<ScoredText> {
        match self.client.complete(prompt, subject, temperature).await {
            Ok(content) => {
                let items = self.score_segments(&content);
                debug!(kind, subject = %subject, count = items.len(), "generated items");
                items
            },
            Err(err) => {
                warn!(kind, subject = %subject, error = %err, "generation failed, showing no items");
                Vec::new()
            },
        }
    }

    /// Splits generated content on `||`, drops blank segments and scores the
    /// rest, preserving order.
    pub fn score_segments(&self, content: &str) -> Vec<ScoredText> {
        content
            .split(DELIMITER)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| ScoredText {
                text: segment.to_string(),
                sentiment: self.analyzer.compound(segment),
            })
            .collect()
    }
}

/// Arithmetic mean of the scores, `0.0` for no items.
pub fn average_sentiment(items: &[ScoredText]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|item| item.sentiment).sum::<f64>() / items.len() as f64
}
