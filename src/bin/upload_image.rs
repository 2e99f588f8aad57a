use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use moodcanvas::{
    aws, fetch::HttpImageSource, handlers::FetchInvocation, logger, ImageFetcher, PipelineConfig,
    S3ArtifactStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    logger::init()?;
    logger::log_startup_info("upload_image", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::from_env()?;
    logger::log_config_info(&config);

    let bucket = config.require_bucket()?.to_string();
    let sdk_config = aws::load_for_region(config.region.as_deref(), &config.bedrock).await;
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&sdk_config), bucket);
    let source = HttpImageSource::new(config.download_timeout)?;

    let fetcher = ImageFetcher::new(&config, Arc::new(source), Arc::new(store))?;
    let fetcher = &fetcher;

    run(service_fn(
        move |event: LambdaEvent<FetchInvocation>| async move {
            logger::set_request_id(event.context.request_id.clone());
            fetcher.handle(event.payload).await.map_err(Error::from)
        },
    ))
    .await
}
