use crate::{
    backend::{GeneratedImage, GenerationBackend, ImageBackend},
    error::{PipelineError, Result},
    logger,
    models::{TitanImageRequest, TitanImageResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::Engine as _;

const SERVICE: &str = "bedrock";

#[derive(Clone)]
pub struct TitanImageBackend {
    client: Client,
    model_id: String,
}

impl TitanImageBackend {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn generate_bytes(&self, prompt: &str) -> Result<Vec<u8>> {
        let request_json = serde_json::to_vec(&TitanImageRequest::text_to_image(prompt))
            .map_err(|e| PipelineError::SerializationError(e.to_string()))?;

        log::info!("Generating image with model: {}", self.model_id);
        let _timer = logger::timer("bedrock invoke_model");

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json))
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
                log::error!("Bedrock invoke_model failed: {}", message);
                PipelineError::aws(SERVICE, message)
            })?;

        decode_titan_response(&response.body.into_inner())
    }
}

/// Pulls the first image out of a Titan response body.
pub fn decode_titan_response(body: &[u8]) -> Result<Vec<u8>> {
    let titan_response: TitanImageResponse = serde_json::from_slice(body)
        .map_err(|e| PipelineError::DecodeError(format!("unable to parse Bedrock response: {}", e)))?;

    if let Some(error) = titan_response.error.filter(|e| !e.is_empty()) {
        return Err(PipelineError::aws(SERVICE, error));
    }

    let first = titan_response
        .images
        .first()
        .ok_or(PipelineError::EmptyResponse(SERVICE))?;

    base64::engine::general_purpose::STANDARD
        .decode(first)
        .map_err(|e| PipelineError::DecodeError(format!("unable to decode image: {}", e)))
}

#[async_trait]
impl ImageBackend for TitanImageBackend {
    fn kind(&self) -> GenerationBackend {
        GenerationBackend::FoundationModel
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        self.generate_bytes(prompt).await.map(GeneratedImage::Bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_first_image() {
        let body = json!({ "images": ["aGVsbG8=", "d29ybGQ="] }).to_string();
        assert_eq!(decode_titan_response(body.as_bytes()).unwrap(), b"hello");
    }

    #[test]
    fn empty_image_list_is_an_error() {
        let body = json!({ "images": [] }).to_string();
        let err = decode_titan_response(body.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResponse("bedrock")));
    }

    #[test]
    fn error_field_is_surfaced() {
        let body = json!({ "images": [], "error": "content filtered" }).to_string();
        let err = decode_titan_response(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("content filtered"));
    }

    #[test]
    fn bad_payloads_are_decode_errors() {
        let err = decode_titan_response(b"not json").unwrap_err();
        assert!(matches!(err, PipelineError::DecodeError(_)));

        let body = json!({ "images": ["%%%"] }).to_string();
        let err = decode_titan_response(body.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::DecodeError(_)));
    }
}
