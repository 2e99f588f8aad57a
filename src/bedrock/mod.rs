pub mod image_client;

use crate::{aws, config::BedrockConfig, error::Result};
use aws_sdk_bedrockruntime::Client;

pub use image_client::TitanImageBackend;

#[derive(Clone)]
pub struct BedrockClient {
    image_backend: TitanImageBackend,
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let region = bedrock_config.region_or_default().to_string();
        log::debug!("Loading Bedrock runtime client for region {}", region);

        let aws_config = aws::load_sdk_config(
            Some(&region),
            bedrock_config.access_key.as_deref(),
            bedrock_config.secret_key.as_deref(),
        )
        .await;

        let client = Client::new(&aws_config);

        Ok(Self {
            image_backend: TitanImageBackend::new(client, bedrock_config.model_id),
        })
    }

    pub fn image(&self) -> &TitanImageBackend {
        &self.image_backend
    }

    pub fn into_image_backend(self) -> TitanImageBackend {
        self.image_backend
    }
}
