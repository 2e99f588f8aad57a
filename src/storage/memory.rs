use crate::{error::Result, storage::traits::ArtifactStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Process-local artifact store for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    bucket_name: String,
    objects: Arc<Mutex<HashMap<String, StoredArtifact>>>,
}

impl MemoryArtifactStore {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            objects: Arc::default(),
        }
    }

    pub fn object(&self, key: &str) -> Option<StoredArtifact> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(
                key.to_string(),
                StoredArtifact {
                    bytes,
                    content_type: content_type.to_string(),
                },
            );
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self
            .objects
            .lock()
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false))
    }

    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overwriting_a_key_is_idempotent() {
        let store = MemoryArtifactStore::new("art");
        store.put("a", vec![1, 2], "image/png").await.unwrap();
        store.put("a", vec![1, 2], "image/png").await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.exists("a").await.unwrap());
        assert!(!store.exists("b").await.unwrap());
        assert_eq!(store.object("a").unwrap().bytes, vec![1, 2]);
    }
}
