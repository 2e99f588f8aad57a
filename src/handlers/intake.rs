use crate::{
    backend::GenerationBackend,
    config::PipelineConfig,
    error::Result,
    events::{self, EventPublisher},
    handlers::error_response,
    models::{
        events::{EventEnvelope, PromptRequest, PromptSubmitted},
        http::{ApiRequest, ApiResponse},
    },
    prompt,
    sentiment::SentimentAnalyzer,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Turns caller text into a generation prompt and announces it on the bus.
pub struct PromptIntake {
    publisher: Arc<dyn EventPublisher>,
    analyzer: Option<Arc<dyn SentimentAnalyzer>>,
    default_backend: GenerationBackend,
    prompt_text_limit: usize,
    generated_key_prefix: String,
}

impl PromptIntake {
    pub fn new(
        config: &PipelineConfig,
        publisher: Arc<dyn EventPublisher>,
        analyzer: Option<Arc<dyn SentimentAnalyzer>>,
    ) -> Result<Self> {
        config.require_event_bus()?;

        Ok(Self {
            publisher,
            analyzer,
            default_backend: config.default_backend,
            prompt_text_limit: config.prompt_text_limit,
            generated_key_prefix: config.generated_key_prefix.clone(),
        })
    }

    /// Validates the request and builds the prompt, consulting sentiment
    /// analysis when an analyzer is wired in.
    pub async fn prepare(&self, request: &PromptRequest) -> Result<PromptSubmitted> {
        let text = prompt::truncate_chars(request.text()?, self.prompt_text_limit);

        let mood = match &self.analyzer {
            Some(analyzer) => {
                let scores = analyzer.detect(text).await?;
                let mood = scores.mood();
                log::info!("Top sentiment mood: {}", mood);
                Some(mood)
            }
            None => None,
        };

        let prompt = prompt::build_prompt(text, mood, self.prompt_text_limit);
        let s3_key = match request.target_key() {
            Some(key) => key.to_string(),
            None => format!("{}{}", self.generated_key_prefix, Uuid::new_v4()),
        };
        let backend = request.requested_backend().unwrap_or(self.default_backend);

        Ok(PromptSubmitted::new(prompt, s3_key, backend))
    }

    pub async fn submit(&self, request: &PromptRequest) -> Result<PromptSubmitted> {
        let detail = self.prepare(request).await?;
        events::publish_detail(self.publisher.as_ref(), &detail).await?;
        log::info!(
            "Prompt submitted for key {} using {}",
            detail.s3_key,
            detail.backend_or(self.default_backend)
        );
        Ok(detail)
    }

    /// Synchronous entry: `{ "text": ... }` body in, status-coded response out.
    pub async fn handle_http(&self, request: ApiRequest) -> ApiResponse {
        let result = match request.json_body::<PromptRequest>() {
            Ok(body) => self.submit(&body).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(detail) => ApiResponse::json(
                200,
                json!({ "message": "Prompt submitted", "s3Key": detail.s3_key }),
            ),
            Err(e) => {
                log::error!("Prompt intake failed: {}", e);
                error_response(&e)
            }
        }
    }

    /// Asynchronous entry: an event whose detail is a [`PromptRequest`].
    pub async fn handle_event(
        &self,
        envelope: EventEnvelope<PromptRequest>,
    ) -> Result<PromptSubmitted> {
        if let Some(detail_type) = envelope.detail_type.as_deref() {
            log::debug!("Received {} event", detail_type);
        }
        self.submit(&envelope.detail).await.map_err(|e| {
            log::error!("Prompt intake failed: {}", e);
            e
        })
    }
}

impl std::fmt::Debug for PromptIntake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptIntake")
            .field("sentiment", &self.analyzer.is_some())
            .field("default_backend", &self.default_backend)
            .field("prompt_text_limit", &self.prompt_text_limit)
            .finish()
    }
}
