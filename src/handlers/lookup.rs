use crate::{
    config::PipelineConfig,
    error::Result,
    handlers::error_response,
    models::http::{ApiRequest, ApiResponse},
    storage::{self, ArtifactStore},
};
use serde_json::json;
use std::sync::Arc;

pub const KEY_PARAM: &str = "s3Key";

/// Answers "does this key exist yet, and where can it be read" for polling clients.
pub struct ImageLookup {
    store: Arc<dyn ArtifactStore>,
    bucket_name: String,
    region: String,
}

impl ImageLookup {
    pub fn new(config: &PipelineConfig, store: Arc<dyn ArtifactStore>) -> Result<Self> {
        let bucket_name = config.require_bucket()?.to_string();
        let region = config.require_region()?.to_string();
        Ok(Self {
            store,
            bucket_name,
            region,
        })
    }

    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let key = match request.query(KEY_PARAM).filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => {
                log::warn!("Missing query parameter '{}'", KEY_PARAM);
                return ApiResponse::empty(400);
            }
        };

        match self.store.exists(key).await {
            Ok(true) => match storage::public_url(&self.bucket_name, &self.region, key) {
                Ok(url) => ApiResponse::json(200, json!({ "url": url })),
                Err(e) => {
                    log::error!("Cannot build public url for {}: {}", key, e);
                    error_response(&e)
                }
            },
            Ok(false) => {
                log::info!("Object {} does not exist yet", key);
                ApiResponse::empty(404)
            }
            // Callers only poll; a failed check reads the same as "not there yet".
            Err(e) => {
                log::error!("Error checking if object {} exists: {}", key, e);
                ApiResponse::empty(404)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, Result};
    use crate::storage::MemoryArtifactStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl ArtifactStore for BrokenStore {
        async fn put(&self, _key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<()> {
            Err(PipelineError::aws("s3", "AccessDenied"))
        }

        async fn exists(&self, _key: &str) -> Result<bool> {
            Err(PipelineError::aws("s3", "AccessDenied"))
        }

        fn bucket_name(&self) -> &str {
            "art"
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new().with_bucket("art").with_region("eu-north-1")
    }

    #[tokio::test]
    async fn existing_key_returns_public_url() {
        let store = Arc::new(MemoryArtifactStore::new("art"));
        store.put("images/a.png", vec![1], "image/png").await.unwrap();
        let lookup = ImageLookup::new(&config(), store).unwrap();

        let response = lookup
            .handle(ApiRequest::with_query("s3Key", "images/a.png"))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "url": "https://art.s3.eu-north-1.amazonaws.com/images/a.png" })
        );
    }

    #[tokio::test]
    async fn key_with_spaces_is_encoded_in_url() {
        let store = Arc::new(MemoryArtifactStore::new("art"));
        store.put("my cat #1.png", vec![1], "image/png").await.unwrap();
        let lookup = ImageLookup::new(&config(), store).unwrap();

        let response = lookup
            .handle(ApiRequest::with_query("s3Key", "my cat #1.png"))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body_json().unwrap()["url"],
            "https://art.s3.eu-north-1.amazonaws.com/my%20cat%20%231.png"
        );
    }

    #[tokio::test]
    async fn unknown_key_is_404_without_url() {
        let lookup =
            ImageLookup::new(&config(), Arc::new(MemoryArtifactStore::new("art"))).unwrap();
        let response = lookup.handle(ApiRequest::with_query("s3Key", "never")).await;
        assert_eq!(response.status_code, 404);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn failed_check_is_also_404() {
        let lookup = ImageLookup::new(&config(), Arc::new(BrokenStore)).unwrap();
        let response = lookup.handle(ApiRequest::with_query("s3Key", "x")).await;
        assert_eq!(response, ApiResponse::empty(404));
    }

    #[tokio::test]
    async fn missing_key_is_400() {
        let lookup =
            ImageLookup::new(&config(), Arc::new(MemoryArtifactStore::new("art"))).unwrap();
        assert_eq!(lookup.handle(ApiRequest::default()).await.status_code, 400);
        assert_eq!(
            lookup
                .handle(ApiRequest::with_query("s3Key", ""))
                .await
                .status_code,
            400
        );
    }

    #[test]
    fn requires_bucket_and_region() {
        let store: Arc<dyn ArtifactStore> = Arc::new(MemoryArtifactStore::new("art"));
        assert!(ImageLookup::new(&PipelineConfig::new().with_region("r"), store.clone()).is_err());
        assert!(ImageLookup::new(&PipelineConfig::new().with_bucket("b"), store).is_err());
    }
}
