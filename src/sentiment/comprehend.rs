use crate::{
    error::{PipelineError, Result},
    logger,
    sentiment::{SentimentAnalyzer, SentimentScores},
};
use async_trait::async_trait;
use aws_sdk_comprehend::{error::ProvideErrorMetadata, types::LanguageCode, Client};

const SERVICE: &str = "comprehend";

/// Sentiment analysis backed by Amazon Comprehend `DetectSentiment`.
#[derive(Clone)]
pub struct ComprehendAnalyzer {
    client: Client,
    language_code: LanguageCode,
}

impl ComprehendAnalyzer {
    pub fn new(client: Client, language_code: &str) -> Self {
        Self {
            client,
            language_code: LanguageCode::from(language_code),
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for ComprehendAnalyzer {
    async fn detect(&self, text: &str) -> Result<SentimentScores> {
        log::info!("Detecting sentiment for text of {} chars", text.chars().count());
        let _timer = logger::timer("comprehend detect_sentiment");

        let response = self
            .client
            .detect_sentiment()
            .text(text)
            .language_code(self.language_code.clone())
            .send()
            .await
            .map_err(|e| {
                let message = match e.as_service_error() {
                    Some(service_error) => format!(
                        "{}: {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or_default()
                    ),
                    None => e.to_string(),
                };
                log::error!("Failed to detect sentiment: {}", message);
                PipelineError::aws(SERVICE, message)
            })?;

        let score = response
            .sentiment_score()
            .ok_or(PipelineError::EmptyResponse(SERVICE))?;

        let scores = SentimentScores::new(
            score.positive().unwrap_or_default(),
            score.negative().unwrap_or_default(),
            score.neutral().unwrap_or_default(),
            score.mixed().unwrap_or_default(),
        );
        log::debug!("Sentiment scores: {:?}", scores);
        Ok(scores)
    }
}
