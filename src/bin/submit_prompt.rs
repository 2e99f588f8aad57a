use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use moodcanvas::{
    aws, logger, models::http::ApiRequest, ComprehendAnalyzer, EventBridgePublisher,
    PipelineConfig, PromptIntake, SentimentAnalyzer,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    logger::init()?;
    logger::log_startup_info("submit_prompt", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::from_env()?;
    logger::log_config_info(&config);

    let event_bus = config.require_event_bus()?.to_string();
    let sdk_config = aws::load_for_region(config.region.as_deref(), &config.bedrock).await;
    let publisher =
        EventBridgePublisher::new(aws_sdk_eventbridge::Client::new(&sdk_config), event_bus);

    let analyzer: Option<Arc<dyn SentimentAnalyzer>> = if config.sentiment.enabled {
        let sentiment_config =
            aws::load_for_region(config.sentiment_region(), &config.bedrock).await;
        Some(Arc::new(ComprehendAnalyzer::new(
            aws_sdk_comprehend::Client::new(&sentiment_config),
            &config.sentiment.language_code,
        )))
    } else {
        None
    };

    let intake = PromptIntake::new(&config, Arc::new(publisher), analyzer)?;
    let intake = &intake;

    run(service_fn(move |event: LambdaEvent<ApiRequest>| async move {
        logger::set_request_id(event.context.request_id.clone());
        Ok::<_, Error>(intake.handle_http(event.payload).await)
    }))
    .await
}
