use crate::config::BedrockConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::config::{Credentials, Region};

/// Loads shared SDK configuration for one region. Explicit credentials win over
/// the default provider chain.
pub async fn load_sdk_config(
    region: Option<&str>,
    access_key: Option<&str>,
    secret_key: Option<&str>,
) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }

    if let (Some(access_key), Some(secret_key)) = (access_key, secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "moodcanvas",
        ));
    }

    loader.load().await
}

/// SDK configuration for the deployment region, using the same credentials as
/// the foundation-model client.
pub async fn load_for_region(region: Option<&str>, credentials: &BedrockConfig) -> SdkConfig {
    load_sdk_config(
        region,
        credentials.access_key.as_deref(),
        credentials.secret_key.as_deref(),
    )
    .await
}
