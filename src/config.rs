use crate::{
    backend::GenerationBackend,
    error::{PipelineError, Result},
};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_IMAGE_MODEL: &str = "amazon.titan-image-generator-v1";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_PROMPT_TEXT_LIMIT: usize = 400;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FETCH_KEY_PREFIX: &str = "images/";
pub const DEFAULT_GENERATED_KEY_PREFIX: &str = "generated/";

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// The foundation model is only offered in a few regions, so it gets its
    /// own region instead of the deployment one.
    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_BEDROCK_REGION)
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            model: DEFAULT_OPENAI_IMAGE_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub enabled: bool,
    pub region: Option<String>,
    pub language_code: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        SentimentConfig {
            enabled: true,
            region: None,
            language_code: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub bucket_name: Option<String>,
    pub event_bus_name: Option<String>,
    pub region: Option<String>,
    pub bedrock: BedrockConfig,
    pub openai: OpenAiConfig,
    pub sentiment: SentimentConfig,
    pub default_backend: GenerationBackend,
    pub prompt_text_limit: usize,
    pub download_timeout: Duration,
    pub fetch_key_prefix: String,
    pub generated_key_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            bucket_name: None,
            event_bus_name: None,
            region: None,
            bedrock: BedrockConfig::default(),
            openai: OpenAiConfig::default(),
            sentiment: SentimentConfig::default(),
            default_backend: GenerationBackend::FoundationModel,
            prompt_text_limit: DEFAULT_PROMPT_TEXT_LIMIT,
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            fetch_key_prefix: DEFAULT_FETCH_KEY_PREFIX.to_string(),
            generated_key_prefix: DEFAULT_GENERATED_KEY_PREFIX.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_source<F>(source: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| source(key).filter(|value| !value.trim().is_empty());

        let mut bedrock = BedrockConfig::default();
        bedrock.region = get("BEDROCK_REGION");
        if let (Some(access_key), Some(secret_key)) =
            (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY"))
        {
            bedrock = bedrock.with_credentials(access_key, secret_key);
        }
        if let Some(model_id) = get("BEDROCK_IMAGE_MODEL") {
            bedrock.model_id = model_id;
        }

        let mut openai = OpenAiConfig::default();
        openai.api_key = get("OPENAI_API_KEY");
        if let Some(api_base) = get("OPENAI_API_BASE") {
            openai.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(model) = get("OPENAI_IMAGE_MODEL") {
            openai.model = model;
        }
        openai.timeout = parse_var::<u64>("GENERATION_TIMEOUT_SECS", get("GENERATION_TIMEOUT_SECS"))?
            .map(Duration::from_secs);

        let mut sentiment = SentimentConfig::default();
        sentiment.region = get("SENTIMENT_REGION");
        if let Some(enabled) = parse_var::<bool>("SENTIMENT_ENABLED", get("SENTIMENT_ENABLED"))? {
            sentiment.enabled = enabled;
        }
        if let Some(language_code) = get("SENTIMENT_LANGUAGE") {
            sentiment.language_code = language_code;
        }

        let default_backend = match get("DEFAULT_BACKEND") {
            Some(raw) => raw.parse::<GenerationBackend>()?,
            None => GenerationBackend::FoundationModel,
        };

        let prompt_text_limit = parse_var::<usize>("PROMPT_TEXT_LIMIT", get("PROMPT_TEXT_LIMIT"))?
            .unwrap_or(DEFAULT_PROMPT_TEXT_LIMIT);
        if prompt_text_limit == 0 {
            return Err(PipelineError::config("PROMPT_TEXT_LIMIT must be positive"));
        }

        let download_timeout =
            parse_var::<u64>("DOWNLOAD_TIMEOUT_SECS", get("DOWNLOAD_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS);

        Ok(PipelineConfig {
            bucket_name: get("BUCKET_NAME"),
            event_bus_name: get("EVENT_BUS_NAME"),
            region: get("REGION").or_else(|| get("AWS_REGION")),
            bedrock,
            openai,
            sentiment,
            default_backend,
            prompt_text_limit,
            download_timeout: Duration::from_secs(download_timeout),
            fetch_key_prefix: get("FETCH_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_FETCH_KEY_PREFIX.to_string()),
            generated_key_prefix: get("GENERATED_KEY_PREFIX")
                .unwrap_or_else(|| DEFAULT_GENERATED_KEY_PREFIX.to_string()),
        })
    }

    pub fn with_bucket(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn with_event_bus(mut self, event_bus_name: impl Into<String>) -> Self {
        self.event_bus_name = Some(event_bus_name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = config;
        self
    }

    pub fn with_sentiment(mut self, enabled: bool) -> Self {
        self.sentiment.enabled = enabled;
        self
    }

    pub fn with_default_backend(mut self, backend: GenerationBackend) -> Self {
        self.default_backend = backend;
        self
    }

    pub fn with_prompt_text_limit(mut self, limit: usize) -> Self {
        self.prompt_text_limit = limit;
        self
    }

    pub fn require_bucket(&self) -> Result<&str> {
        require(self.bucket_name.as_deref(), "BUCKET_NAME")
    }

    pub fn require_event_bus(&self) -> Result<&str> {
        require(self.event_bus_name.as_deref(), "EVENT_BUS_NAME")
    }

    pub fn require_region(&self) -> Result<&str> {
        require(self.region.as_deref(), "REGION")
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        require(self.openai.api_key.as_deref(), "OPENAI_API_KEY")
    }

    /// Region used for sentiment analysis, falling back to the deployment region.
    pub fn sentiment_region(&self) -> Option<&str> {
        self.sentiment.region.as_deref().or(self.region.as_deref())
    }
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value.ok_or_else(|| PipelineError::config(format!("missing {}", name)))
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| PipelineError::config(format!("{} has an invalid value: {}", name, raw))),
        None => Ok(None),
    }
}
