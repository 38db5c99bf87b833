use hubmail_sender::{SenderContext, handler};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!(
        version = hubmail_core::VERSION,
        "Starting Hubmail custom email sender"
    );

    // Missing key reference or parameter name is fatal before the first invocation
    let ctx = Arc::new(SenderContext::from_env().await?);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let ctx = Arc::clone(&ctx);
        async move { handler(&ctx, event).await }
    }))
    .await
}
