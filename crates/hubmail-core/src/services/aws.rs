/// Shared AWS SDK configuration
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads SDK config once per process; `region` overrides the default chain.
pub async fn load_aws_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
