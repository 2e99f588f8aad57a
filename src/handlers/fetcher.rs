use crate::{
    config::PipelineConfig,
    error::Result,
    fetch::{self, ImageSource},
    models::events::{EventDetail, EventEnvelope, ImageGenerated},
    storage::{detect_content_type, ArtifactStore},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Direct invocation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFetchRequest {
    pub url: String,
    #[serde(default)]
    pub s3_key: Option<String>,
}

/// The fetcher is triggered either by the bus or by a direct call.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FetchInvocation {
    Event(EventEnvelope<ImageGenerated>),
    Direct(ImageFetchRequest),
}

impl FetchInvocation {
    fn into_request(self) -> Result<ImageFetchRequest> {
        let request = match self {
            FetchInvocation::Event(envelope) => {
                envelope.detail.validate()?;
                ImageFetchRequest {
                    url: envelope.detail.url,
                    s3_key: envelope.detail.s3_key,
                }
            }
            FetchInvocation::Direct(request) => request,
        };
        fetch::parse_url(&request.url)?;
        Ok(request)
    }
}

/// Downloads a remote image and stores it under its resolved key.
pub struct ImageFetcher {
    source: Arc<dyn ImageSource>,
    store: Arc<dyn ArtifactStore>,
    key_prefix: String,
}

impl ImageFetcher {
    pub fn new(
        config: &PipelineConfig,
        source: Arc<dyn ImageSource>,
        store: Arc<dyn ArtifactStore>,
    ) -> Result<Self> {
        config.require_bucket()?;

        Ok(Self {
            source,
            store,
            key_prefix: config.fetch_key_prefix.clone(),
        })
    }

    /// Stores the image and returns the key it was written under.
    pub async fn handle(&self, invocation: FetchInvocation) -> Result<String> {
        let request = invocation.into_request()?;
        self.fetch(&request).await.map_err(|e| {
            log::error!("Image upload failed for {}: {}", request.url, e);
            e
        })
    }

    pub async fn fetch(&self, request: &ImageFetchRequest) -> Result<String> {
        let key = match request.s3_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => key.to_string(),
            None => fetch::derive_key(&request.url, &self.key_prefix)?,
        };

        log::info!("Downloading image for key {}", key);
        let bytes = self.source.download(&request.url).await?;
        let content_type = detect_content_type(&bytes);
        log::debug!("Downloaded {} bytes of {}", bytes.len(), content_type);

        self.store.put(&key, bytes, content_type).await?;
        Ok(key)
    }
}
