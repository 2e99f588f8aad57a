use crate::{
    backend::{GeneratedImage, GenerationBackend, ImageBackend},
    config::PipelineConfig,
    error::{PipelineError, Result},
    events::{self, EventPublisher},
    models::events::{EventDetail, EventEnvelope, ImageGenerated, ImageStored, PromptSubmitted},
    storage::{detect_content_type, ArtifactStore},
};
use std::sync::Arc;
use uuid::Uuid;

/// Where a generated image ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLocation {
    /// Written to the artifact store by this stage.
    Stored { content_type: String },
    /// Still remote; the fetcher downloads it.
    Remote { url: String },
}

/// Backend-independent outcome of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImageResult {
    pub target_key: String,
    pub backend: GenerationBackend,
    pub location: ImageLocation,
}

pub struct ImageGenerator {
    store: Arc<dyn ArtifactStore>,
    publisher: Arc<dyn EventPublisher>,
    foundation_model: Option<Arc<dyn ImageBackend>>,
    third_party: Option<Arc<dyn ImageBackend>>,
    default_backend: GenerationBackend,
    generated_key_prefix: String,
}

impl ImageGenerator {
    pub fn new(
        config: &PipelineConfig,
        store: Arc<dyn ArtifactStore>,
        publisher: Arc<dyn EventPublisher>,
        foundation_model: Option<Arc<dyn ImageBackend>>,
        third_party: Option<Arc<dyn ImageBackend>>,
    ) -> Result<Self> {
        config.require_bucket()?;
        config.require_event_bus()?;

        if foundation_model.is_none() && third_party.is_none() {
            return Err(PipelineError::config("no image generation backend configured"));
        }
        check_slot(&foundation_model, GenerationBackend::FoundationModel)?;
        check_slot(&third_party, GenerationBackend::ThirdPartyApi)?;

        Ok(Self {
            store,
            publisher,
            foundation_model,
            third_party,
            default_backend: config.default_backend,
            generated_key_prefix: config.generated_key_prefix.clone(),
        })
    }

    fn backend_for(&self, backend: GenerationBackend) -> Result<&Arc<dyn ImageBackend>> {
        let (selected, missing) = match backend {
            GenerationBackend::FoundationModel => {
                (self.foundation_model.as_ref(), "foundation model backend is not configured")
            }
            GenerationBackend::ThirdPartyApi => {
                (self.third_party.as_ref(), "missing OPENAI_API_KEY")
            }
        };
        selected.ok_or_else(|| PipelineError::config(missing))
    }

    pub async fn handle(
        &self,
        envelope: EventEnvelope<PromptSubmitted>,
    ) -> Result<GeneratedImageResult> {
        self.generate(&envelope.detail).await.map_err(|e| {
            log::error!("Image generation failed: {}", e);
            e
        })
    }

    pub async fn generate(&self, request: &PromptSubmitted) -> Result<GeneratedImageResult> {
        request.validate()?;

        let backend_kind = request.backend_or(self.default_backend);
        let backend = self.backend_for(backend_kind)?;
        let target_key = if request.s3_key.trim().is_empty() {
            format!("{}{}", self.generated_key_prefix, Uuid::new_v4())
        } else {
            request.s3_key.clone()
        };

        log::info!("Generating image for key {} with {}", target_key, backend_kind);
        let image = backend.generate(&request.prompt).await?;

        let location = match image {
            GeneratedImage::Bytes(bytes) => {
                let content_type = detect_content_type(&bytes);
                self.store.put(&target_key, bytes, content_type).await?;
                events::publish_detail(
                    self.publisher.as_ref(),
                    &ImageStored::new(&target_key, content_type),
                )
                .await?;
                ImageLocation::Stored {
                    content_type: content_type.to_string(),
                }
            }
            GeneratedImage::RemoteUrl(url) => {
                events::publish_detail(
                    self.publisher.as_ref(),
                    &ImageGenerated::new(&url, Some(target_key.clone())),
                )
                .await?;
                ImageLocation::Remote { url }
            }
        };

        Ok(GeneratedImageResult {
            target_key,
            backend: backend_kind,
            location,
        })
    }
}

fn check_slot(backend: &Option<Arc<dyn ImageBackend>>, expected: GenerationBackend) -> Result<()> {
    match backend {
        Some(backend) if backend.kind() != expected => Err(PipelineError::config(format!(
            "{} backend wired into the {} slot",
            backend.kind(),
            expected
        ))),
        _ => Ok(()),
    }
}

impl std::fmt::Debug for ImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerator")
            .field("bucket", &self.store.bucket_name())
            .field("foundation_model", &self.foundation_model.is_some())
            .field("third_party", &self.third_party.is_some())
            .field("default_backend", &self.default_backend)
            .finish()
    }
}
