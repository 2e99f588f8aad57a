//! Serverless text-to-image pipeline.
//!
//! Prompt Intake turns caller text into a mood-aware prompt, the Image
//! Generator renders it with Bedrock or the OpenAI Images API, the Image
//! Fetcher stores remote results in S3, and Image Lookup tells polling
//! clients when an image is ready. Stages talk only through the event
//! schemas in [`models::events`].

pub mod aws;
pub mod backend;
pub mod bedrock;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod handlers;
pub mod logger;
pub mod models;
pub mod openai;
pub mod prompt;
pub mod sentiment;
pub mod storage;

pub use backend::{GeneratedImage, GenerationBackend, ImageBackend};
pub use bedrock::{BedrockClient, TitanImageBackend};
pub use config::{BedrockConfig, OpenAiConfig, PipelineConfig};
pub use error::{PipelineError, Result};
pub use events::{EventBridgePublisher, EventPublisher};
pub use handlers::{ImageFetcher, ImageGenerator, ImageLookup, PromptIntake};
pub use openai::OpenAiImageBackend;
pub use sentiment::{ComprehendAnalyzer, Mood, SentimentAnalyzer, SentimentScores};
pub use storage::{ArtifactStore, MemoryArtifactStore, S3ArtifactStore};
