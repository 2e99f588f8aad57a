pub mod content_type;
pub mod memory;
pub mod s3;
pub mod traits;

pub use content_type::detect_content_type;
pub use memory::{MemoryArtifactStore, StoredArtifact};
pub use s3::S3ArtifactStore;
pub use traits::ArtifactStore;

use crate::error::{PipelineError, Result};
use url::Url;

/// Public read URL of `key` in `bucket`, virtual-hosted style. Each `/`
/// separated part of the key is percent-encoded as a path segment.
pub fn public_url(bucket: &str, region: &str, key: &str) -> Result<String> {
    let mut url = Url::parse(&format!("https://{}.s3.{}.amazonaws.com/", bucket, region))
        .map_err(|e| PipelineError::config(format!("invalid bucket or region: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| PipelineError::config("bucket url cannot carry a path"))?
        .clear()
        .extend(key.split('/'));
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_is_virtual_hosted() {
        assert_eq!(
            public_url("art", "eu-north-1", "images/cat.png").unwrap(),
            "https://art.s3.eu-north-1.amazonaws.com/images/cat.png"
        );
    }

    #[test]
    fn public_url_encodes_key_segments() {
        assert_eq!(
            public_url("art", "eu-north-1", "my images/cat #1?.png").unwrap(),
            "https://art.s3.eu-north-1.amazonaws.com/my%20images/cat%20%231%3F.png"
        );
    }

    #[test]
    fn public_url_rejects_unusable_host() {
        assert!(matches!(
            public_url("bad bucket", "eu-north-1", "a.png"),
            Err(PipelineError::ConfigError(_))
        ));
    }
}
