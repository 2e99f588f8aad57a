use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which upstream service turns a prompt into an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationBackend {
    /// Bedrock foundation model; returns image bytes that are stored directly.
    FoundationModel,
    /// Third-party image API; returns a remote URL that the fetcher downloads.
    ThirdPartyApi,
}

impl GenerationBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationBackend::FoundationModel => "foundationModel",
            GenerationBackend::ThirdPartyApi => "thirdPartyApi",
        }
    }

    /// Maps the legacy `bedrock: bool` request flag.
    pub fn from_legacy_flag(bedrock: bool) -> Self {
        if bedrock {
            GenerationBackend::FoundationModel
        } else {
            GenerationBackend::ThirdPartyApi
        }
    }
}

impl fmt::Display for GenerationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationBackend {
    type Err = PipelineError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "foundationmodel" | "foundation_model" | "bedrock" | "titan" => {
                Ok(GenerationBackend::FoundationModel)
            }
            "thirdpartyapi" | "third_party_api" | "openai" | "dalle" => {
                Ok(GenerationBackend::ThirdPartyApi)
            }
            other => Err(PipelineError::config(format!(
                "unknown generation backend: {}",
                other
            ))),
        }
    }
}

/// What a backend hands back, before it is normalised into an event.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedImage {
    Bytes(Vec<u8>),
    RemoteUrl(String),
}

#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn kind(&self) -> GenerationBackend;
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;
}
