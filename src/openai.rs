use crate::{
    backend::{GeneratedImage, GenerationBackend, ImageBackend},
    config::OpenAiConfig,
    error::{PipelineError, Result},
    logger,
    models::{OpenAiImageRequest, OpenAiImageResponse},
};
use async_trait::async_trait;
use reqwest::Client;

const SERVICE: &str = "openai";

/// Third-party image generation over the OpenAI Images API.
#[derive(Clone)]
pub struct OpenAiImageBackend {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiImageBackend {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::config("missing OPENAI_API_KEY"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PipelineError::config(format!("unable to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/images/generations", config.api_base),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate_url(&self, prompt: &str) -> Result<String> {
        let payload = OpenAiImageRequest::new(&self.model, prompt);
        log::info!("Sending image request to {} with model {}", self.endpoint, self.model);
        log::debug!("Image prompt: {}", prompt);
        let _timer = logger::timer("openai images/generations");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Error sending request to {}: {}", self.endpoint, e);
                PipelineError::RequestError {
                    service: SERVICE,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| PipelineError::RequestError {
            service: SERVICE,
            message: format!("error reading response body: {}", e),
        })?;
        log::info!("Received response with status: {}", status);

        parse_image_response(status.as_u16(), &body)
    }
}

/// Turns a raw Images API response into the first image URL.
pub fn parse_image_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        log::error!("Non-OK HTTP status: {}, response body: {}", status, body);
        return Err(PipelineError::UpstreamStatus {
            service: SERVICE,
            status,
            body: body.to_string(),
        });
    }

    let parsed: OpenAiImageResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::DecodeError(format!("unable to parse OpenAI response: {}", e)))?;

    match parsed.data.into_iter().next() {
        Some(image) => image
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PipelineError::DecodeError("image entry has no url".into())),
        None => {
            log::error!("No data received in the response");
            Err(PipelineError::EmptyResponse(SERVICE))
        }
    }
}

#[async_trait]
impl ImageBackend for OpenAiImageBackend {
    fn kind(&self) -> GenerationBackend {
        GenerationBackend::ThirdPartyApi
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        self.generate_url(prompt).await.map(GeneratedImage::RemoteUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_api_key() {
        let err = OpenAiImageBackend::new(&OpenAiConfig::new()).err().unwrap();
        assert!(matches!(err, PipelineError::ConfigError(ref m) if m.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn builds_endpoint_from_base() {
        let config = OpenAiConfig::new()
            .with_api_key("sk-test")
            .with_api_base("http://localhost:8080/v1");
        let backend = OpenAiImageBackend::new(&config).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:8080/v1/images/generations");
    }

    #[test]
    fn takes_first_url() {
        let body = r#"{"created":1,"data":[{"url":"https://img/1.png"},{"url":"https://img/2.png"}]}"#;
        assert_eq!(parse_image_response(200, body).unwrap(), "https://img/1.png");
    }

    #[test]
    fn empty_data_is_an_explicit_error() {
        let err = parse_image_response(200, r#"{"data":[]}"#).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResponse("openai")));
        assert_eq!(err.to_string(), "No data in the response from openai");
    }

    #[test]
    fn non_success_status_keeps_status_and_body() {
        let err = parse_image_response(400, r#"{"error":{"message":"bad prompt"}}"#).unwrap_err();
        assert_eq!(err.upstream_status(), Some(400));
        assert!(err.to_string().contains("bad prompt"));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_image_response(200, "<html>").unwrap_err();
        assert!(matches!(err, PipelineError::DecodeError(_)));
    }
}
