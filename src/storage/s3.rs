use crate::{
    error::{PipelineError, Result},
    logger,
    storage::traits::ArtifactStore,
};
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, Client};

const SERVICE: &str = "s3";

#[derive(Clone)]
pub struct S3ArtifactStore {
    client: Client,
    bucket_name: String,
}

impl S3ArtifactStore {
    pub fn new(client: Client, bucket_name: impl Into<String>) -> Self {
        Self {
            client,
            bucket_name: bucket_name.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let size = bytes.len();
        log::debug!(
            "Writing {} bytes ({}) to S3 bucket {} with key: {}",
            size,
            content_type,
            self.bucket_name,
            key
        );
        let _timer = logger::timer("s3 put_object");

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                log::error!(
                    "S3 PUT failed - Bucket: {}, Key: {}, Error: {}",
                    self.bucket_name,
                    key,
                    e
                );
                PipelineError::aws(SERVICE, e)
            })?;

        log::info!("Successfully uploaded image to S3: {} ({} bytes)", key, size);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        log::debug!(
            "Checking if exists in S3 bucket {} with key: {}",
            self.bucket_name,
            key
        );

        match self
            .client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(PipelineError::aws(
                        SERVICE,
                        format!("failed to check existence: {}", service_error),
                    ))
                }
            }
        }
    }

    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}
