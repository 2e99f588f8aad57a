//! Recording doubles for handler tests. Each counts its calls so tests can
//! assert that nothing external was contacted.

use crate::{
    backend::{GeneratedImage, GenerationBackend, ImageBackend},
    error::{PipelineError, Result},
    events::EventPublisher,
    fetch::ImageSource,
    models::events::OutboundEvent,
    sentiment::{SentimentAnalyzer, SentimentScores},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
    0x00, 0x00, 0x00, 0x01,
];
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<OutboundEvent>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn published(&self) -> Vec<OutboundEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        if self.fail {
            return Err(PipelineError::aws("eventbridge", "AccessDenied"));
        }
        Ok(())
    }
}

pub struct StubAnalyzer {
    pub scores: Option<SentimentScores>,
    pub calls: AtomicUsize,
    pub texts: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    pub fn returning(scores: SentimentScores) -> Self {
        Self {
            scores: Some(scores),
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            scores: None,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentAnalyzer for StubAnalyzer {
    async fn detect(&self, text: &str) -> Result<SentimentScores> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().push(text.to_string());
        self.scores
            .ok_or_else(|| PipelineError::aws("comprehend", "ThrottlingException"))
    }
}

pub struct StubBackend {
    pub kind: GenerationBackend,
    pub result: Mutex<Option<Result<GeneratedImage>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn bytes(bytes: &[u8]) -> Self {
        Self::with(
            GenerationBackend::FoundationModel,
            Ok(GeneratedImage::Bytes(bytes.to_vec())),
        )
    }

    pub fn url(url: &str) -> Self {
        Self::with(
            GenerationBackend::ThirdPartyApi,
            Ok(GeneratedImage::RemoteUrl(url.to_string())),
        )
    }

    pub fn with(kind: GenerationBackend, result: Result<GeneratedImage>) -> Self {
        Self {
            kind,
            result: Mutex::new(Some(result)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageBackend for StubBackend {
    fn kind(&self) -> GenerationBackend {
        self.kind
    }

    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(PipelineError::EmptyResponse("stub")))
    }
}

#[derive(Default)]
pub struct StubSource {
    pub responses: Mutex<HashMap<String, Result<Vec<u8>>>>,
    pub calls: AtomicUsize,
}

impl StubSource {
    pub fn serving(url: &str, bytes: &[u8]) -> Self {
        let source = Self::default();
        source.add(url, Ok(bytes.to_vec()));
        source
    }

    pub fn add(&self, url: &str, response: Result<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for StubSource {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .remove(url)
            .unwrap_or(Err(PipelineError::UpstreamStatus {
                service: "image download",
                status: 404,
                body: String::new(),
            }))
    }
}
