use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Existence check only; never reads the object body.
    async fn exists(&self, key: &str) -> Result<bool>;

    fn bucket_name(&self) -> &str;
}
