//! Event schemas shared by every stage of the pipeline.
//!
//! Each detail type is defined once here and used by both the stage that
//! publishes it and the stage that consumes it. Every detail carries a
//! `version`; consumers refuse versions newer than [`SCHEMA_VERSION`].

use crate::{
    backend::GenerationBackend,
    error::{PipelineError, Result},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

pub const PROMPT_INTAKE_SOURCE: &str = "prompt_intake_function";
pub const GENERATE_IMAGE_SOURCE: &str = "generate_image_function";

/// A typed event detail with a fixed bus name and source.
pub trait EventDetail: Serialize + DeserializeOwned {
    const DETAIL_TYPE: &'static str;
    const SOURCE: &'static str;

    fn version(&self) -> u32;

    fn validate(&self) -> Result<()> {
        if self.version() > SCHEMA_VERSION {
            return Err(PipelineError::invalid(format!(
                "{} schema version {} is newer than supported version {}",
                Self::DETAIL_TYPE,
                self.version(),
                SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

fn current_version() -> u32 {
    SCHEMA_VERSION
}

/// Bus delivery wrapper around a detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    pub detail: T,
}

impl<T> EventEnvelope<T> {
    pub fn new(detail: T) -> Self {
        Self {
            id: None,
            source: None,
            detail_type: None,
            detail,
        }
    }
}

/// Caller input to Prompt Intake, from either an HTTP body or an event detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub backend: Option<GenerationBackend>,
    /// Legacy boolean backend switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrock: Option<bool>,
}

impl PromptRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Non-empty caller text, or an input error.
    pub fn text(&self) -> Result<&str> {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            Some(_) => Err(PipelineError::invalid("'text' must not be empty")),
            None => Err(PipelineError::invalid("missing field 'text'")),
        }
    }

    /// Explicit variant wins over the legacy flag.
    pub fn requested_backend(&self) -> Option<GenerationBackend> {
        self.backend
            .or_else(|| self.bedrock.map(GenerationBackend::from_legacy_flag))
    }

    /// Caller-chosen key, if it is not blank.
    pub fn target_key(&self) -> Option<&str> {
        self.s3_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// A generation prompt ready for the Image Generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSubmitted {
    #[serde(default = "current_version")]
    pub version: u32,
    pub prompt: String,
    #[serde(default)]
    pub s3_key: String,
    #[serde(default)]
    pub backend: Option<GenerationBackend>,
    #[serde(default, skip_serializing)]
    pub bedrock: Option<bool>,
}

impl PromptSubmitted {
    pub fn new(
        prompt: impl Into<String>,
        s3_key: impl Into<String>,
        backend: GenerationBackend,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION,
            prompt: prompt.into(),
            s3_key: s3_key.into(),
            backend: Some(backend),
            bedrock: None,
        }
    }

    pub fn backend_or(&self, default: GenerationBackend) -> GenerationBackend {
        self.backend
            .or_else(|| self.bedrock.map(GenerationBackend::from_legacy_flag))
            .unwrap_or(default)
    }
}

impl EventDetail for PromptSubmitted {
    const DETAIL_TYPE: &'static str = "promptSubmitted";
    const SOURCE: &'static str = PROMPT_INTAKE_SOURCE;

    fn version(&self) -> u32 {
        self.version
    }

    fn validate(&self) -> Result<()> {
        if self.version > SCHEMA_VERSION {
            return Err(PipelineError::invalid(format!(
                "promptSubmitted schema version {} is newer than supported version {}",
                self.version, SCHEMA_VERSION
            )));
        }
        if self.prompt.trim().is_empty() {
            return Err(PipelineError::invalid("missing field 'prompt'"));
        }
        Ok(())
    }
}

/// A remote image produced by the third-party backend, awaiting download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerated {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Older producers wrote the URL under `prompt`.
    #[serde(alias = "prompt")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}

impl ImageGenerated {
    pub fn new(url: impl Into<String>, s3_key: Option<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            url: url.into(),
            s3_key,
        }
    }
}

impl EventDetail for ImageGenerated {
    const DETAIL_TYPE: &'static str = "imageGenerated";
    const SOURCE: &'static str = GENERATE_IMAGE_SOURCE;

    fn version(&self) -> u32 {
        self.version
    }

    fn validate(&self) -> Result<()> {
        if self.version > SCHEMA_VERSION {
            return Err(PipelineError::invalid(format!(
                "imageGenerated schema version {} is newer than supported version {}",
                self.version, SCHEMA_VERSION
            )));
        }
        if self.url.trim().is_empty() {
            return Err(PipelineError::invalid("missing field 'url'"));
        }
        Ok(())
    }
}

/// An image the foundation-model backend already wrote to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStored {
    #[serde(default = "current_version")]
    pub version: u32,
    pub s3_key: String,
    pub content_type: String,
}

impl ImageStored {
    pub fn new(s3_key: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            s3_key: s3_key.into(),
            content_type: content_type.into(),
        }
    }
}

impl EventDetail for ImageStored {
    const DETAIL_TYPE: &'static str = "imageStored";
    const SOURCE: &'static str = GENERATE_IMAGE_SOURCE;

    fn version(&self) -> u32 {
        self.version
    }
}

/// A serialized event ready for the bus.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub source: String,
    pub detail_type: String,
    pub detail: String,
}

impl OutboundEvent {
    pub fn from_detail<T: EventDetail>(detail: &T) -> Result<Self> {
        let detail = serde_json::to_string(detail)
            .map_err(|e| PipelineError::SerializationError(e.to_string()))?;
        Ok(Self {
            source: T::SOURCE.to_string(),
            detail_type: T::DETAIL_TYPE.to_string(),
            detail,
        })
    }

    /// Decodes the detail back into its typed schema, enforcing the detail type.
    pub fn decode<T: EventDetail>(&self) -> Result<T> {
        if self.detail_type != T::DETAIL_TYPE {
            return Err(PipelineError::invalid(format!(
                "expected {} event, got {}",
                T::DETAIL_TYPE,
                self.detail_type
            )));
        }
        let detail: T = serde_json::from_str(&self.detail)
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        detail.validate()?;
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_request_accepts_legacy_bedrock_flag() {
        let request: PromptRequest = serde_json::from_value(json!({
            "text": "a calm lake",
            "s3Key": "lake.png",
            "bedrock": false
        }))
        .unwrap();
        assert_eq!(request.text().unwrap(), "a calm lake");
        assert_eq!(request.target_key(), Some("lake.png"));
        assert_eq!(
            request.requested_backend(),
            Some(GenerationBackend::ThirdPartyApi)
        );
    }

    #[test]
    fn prompt_request_rejects_missing_or_blank_text() {
        let missing: PromptRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.text().unwrap_err().is_client_error());

        let blank = PromptRequest::new("   ");
        assert!(blank.text().unwrap_err().is_client_error());
    }

    #[test]
    fn image_generated_reads_url_from_legacy_prompt_field() {
        let detail: ImageGenerated =
            serde_json::from_value(json!({ "prompt": "https://img.example/a.png" })).unwrap();
        assert_eq!(detail.url, "https://img.example/a.png");
        assert_eq!(detail.version, SCHEMA_VERSION);
        assert!(detail.s3_key.is_none());
    }

    #[test]
    fn image_generated_requires_a_url() {
        assert!(ImageGenerated::new("https://img.example/a.png", None)
            .validate()
            .is_ok());
        let err = ImageGenerated::new(" ", Some("k".to_string()))
            .validate()
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn envelope_reads_eventbridge_shape() {
        let envelope: EventEnvelope<PromptSubmitted> = serde_json::from_value(json!({
            "id": "abc",
            "source": "prompt_intake_function",
            "detail-type": "promptSubmitted",
            "detail": { "prompt": "Generate a sad image", "s3Key": "k", "bedrock": true }
        }))
        .unwrap();
        assert_eq!(envelope.detail_type.as_deref(), Some("promptSubmitted"));
        assert_eq!(
            envelope.detail.backend_or(GenerationBackend::ThirdPartyApi),
            GenerationBackend::FoundationModel
        );
    }

    #[test]
    fn outbound_event_decodes_with_matching_type_only() {
        let detail = PromptSubmitted::new("p", "k", GenerationBackend::ThirdPartyApi);
        let event = OutboundEvent::from_detail(&detail).unwrap();
        assert_eq!(event.source, PROMPT_INTAKE_SOURCE);
        assert_eq!(event.detail_type, "promptSubmitted");
        assert_eq!(event.decode::<PromptSubmitted>().unwrap(), detail);
        assert!(event.decode::<ImageGenerated>().is_err());
    }

    #[test]
    fn newer_schema_versions_are_rejected() {
        let mut detail = ImageGenerated::new("https://img.example/x.png", None);
        detail.version = SCHEMA_VERSION + 1;
        assert!(detail.validate().unwrap_err().is_client_error());
    }
}
