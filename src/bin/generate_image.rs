use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use moodcanvas::{
    aws, logger,
    models::events::{EventEnvelope, PromptSubmitted},
    BedrockClient, EventBridgePublisher, ImageBackend, ImageGenerator, OpenAiImageBackend,
    PipelineConfig, S3ArtifactStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    logger::init()?;
    logger::log_startup_info("generate_image", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::from_env()?;
    logger::log_config_info(&config);

    let bucket = config.require_bucket()?.to_string();
    let event_bus = config.require_event_bus()?.to_string();
    let sdk_config = aws::load_for_region(config.region.as_deref(), &config.bedrock).await;
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&sdk_config), bucket);
    let publisher =
        EventBridgePublisher::new(aws_sdk_eventbridge::Client::new(&sdk_config), event_bus);

    let foundation_model: Arc<dyn ImageBackend> =
        Arc::new(BedrockClient::new(config.bedrock.clone()).await?.into_image_backend());
    let third_party: Option<Arc<dyn ImageBackend>> = match config.openai.api_key {
        Some(_) => Some(Arc::new(OpenAiImageBackend::new(&config.openai)?)),
        None => {
            log::warn!("OPENAI_API_KEY is not set, third-party backend disabled");
            None
        }
    };

    let generator = ImageGenerator::new(
        &config,
        Arc::new(store),
        Arc::new(publisher),
        Some(foundation_model),
        third_party,
    )?;
    let generator = &generator;

    run(service_fn(
        move |event: LambdaEvent<EventEnvelope<PromptSubmitted>>| async move {
            logger::set_request_id(event.context.request_id.clone());
            generator
                .handle(event.payload)
                .await
                .map(|result| result.target_key)
                .map_err(Error::from)
        },
    ))
    .await
}
