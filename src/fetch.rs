use crate::{
    error::{PipelineError, Result},
    logger,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const SERVICE: &str = "image download";

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Downloads the whole resource into memory.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::config(format!("unable to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let _timer = logger::timer("image download");

        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("Error downloading image: {}", e);
            PipelineError::RequestError {
                service: SERVICE,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!(
                "Received non-OK HTTP status when downloading image: {}",
                status
            );
            return Err(PipelineError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            log::error!("Error reading image data: {}", e);
            PipelineError::RequestError {
                service: SERVICE,
                message: format!("error reading image data: {}", e),
            }
        })?;
        Ok(bytes.to_vec())
    }
}

/// Storage key for a downloaded image: `prefix` followed by the URL's last
/// path segment. Query strings and fragments are ignored.
/// Parses a download URL. Only http(s) sources are accepted.
pub fn parse_url(url: &str) -> Result<Url> {
    if url.trim().is_empty() {
        return Err(PipelineError::invalid("missing field 'url'"));
    }
    let parsed =
        Url::parse(url).map_err(|e| PipelineError::invalid(format!("invalid url {}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(PipelineError::invalid(format!(
            "unsupported url scheme {} in {}",
            scheme, url
        ))),
    }
}

pub fn derive_key(url: &str, prefix: &str) -> Result<String> {
    let parsed = parse_url(url)?;

    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| {
            PipelineError::invalid(format!("url {} has no path segment to derive a key", url))
        })?;

    Ok(format!("{}{}", prefix, segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_key_from_last_segment() {
        let key = derive_key(
            "https://oaidalleapiprodscus.blob.core.windows.net/private/org/user/img-abc.png?st=2024&sig=x",
            "images/",
        )
        .unwrap();
        assert_eq!(key, "images/img-abc.png");
    }

    #[test]
    fn trailing_slash_uses_previous_segment() {
        assert_eq!(
            derive_key("https://cdn.example/a/b/", "images/").unwrap(),
            "images/b"
        );
    }

    #[test]
    fn rejects_urls_without_segments() {
        assert!(derive_key("https://cdn.example/", "images/")
            .unwrap_err()
            .is_client_error());
        assert!(derive_key("not a url", "images/").unwrap_err().is_client_error());
    }

    #[test]
    fn parse_url_accepts_only_http_sources() {
        assert!(parse_url("https://img.example/a.png").is_ok());
        assert!(parse_url("http://img.example/a.png").is_ok());
        for url in ["", "  ", "img.example/a.png", "file:///etc/passwd"] {
            assert!(parse_url(url).unwrap_err().is_client_error(), "url {:?}", url);
        }
    }

    #[test]
    fn builds_client_with_timeout() {
        assert!(HttpImageSource::new(Duration::from_secs(5)).is_ok());
    }
}
