use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use moodcanvas::{
    aws, logger, models::http::ApiRequest, ImageLookup, PipelineConfig, S3ArtifactStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    logger::init()?;
    logger::log_startup_info("get_image", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::from_env()?;
    logger::log_config_info(&config);

    let bucket = config.require_bucket()?.to_string();
    let sdk_config = aws::load_for_region(config.region.as_deref(), &config.bedrock).await;
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&sdk_config), bucket);

    let lookup = ImageLookup::new(&config, Arc::new(store))?;
    let lookup = &lookup;

    run(service_fn(move |event: LambdaEvent<ApiRequest>| async move {
        logger::set_request_id(event.context.request_id.clone());
        Ok::<_, Error>(lookup.handle(event.payload).await)
    }))
    .await
}
