//! Hybrid routing with a user-supplied API key.
//!
//! The host here has no on-device model, so admission sends the request to
//! the cloud. Run with:
//!
//! ```sh
//! GEMINI_API_KEY=... cargo run --example custom_key
//! ```
//!
//! Set `INFERGATE_PROVIDER` to `openai` or `anthropic` to use another provider.

use async_trait::async_trait;
use infergate::prelude::*;
use std::sync::Arc;

/// Engine for a device where the model has not been downloaded yet
#[derive(Debug)]
struct NotDownloaded;

#[async_trait]
impl CapabilityProvider for NotDownloaded {
    async fn availability(&self, _operation: Operation) -> anyhow::Result<CapabilityState> {
        Ok(CapabilityState::NeedsDownload)
    }
}

#[async_trait]
impl LocalEngine for NotDownloaded {
    async fn create_session(
        &self,
        _operation: Operation,
        _options: &SessionOptions,
    ) -> anyhow::Result<Box<dyn LocalSession>> {
        anyhow::bail!("on-device model is not available")
    }
}

const THREAD: &str = "From: Dana\nSubject: Offsite\n\nHi all, the offsite moves from the 12th to \
the 19th because the venue double-booked. Same time, same place. Please confirm by Friday and \
tell me about dietary needs.\n\nFrom: Sam\n\nWorks for me. I'm vegetarian.";

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let provider: ProviderKind = std::env::var("INFERGATE_PROVIDER")
        .unwrap_or_else(|_| "gemini".to_string())
        .parse()?;
    let key_var = format!("{}_API_KEY", provider.id().to_uppercase());
    let api_key = std::env::var(&key_var).expect("API key environment variable not set");

    let processor = HybridProcessor::builder()
        .engine(Arc::new(NotDownloaded))
        .connector(HttpConnector::new().layer(LoggingLayer::new()))
        .credentials(vec![ProviderCredential::new(provider, api_key)])
        .finish();

    println!("=== Pre-flight ===");
    let decision = processor
        .decide(ProcessingMode::Hybrid, THREAD, Operation::Summarise)
        .await;
    println!("{}\n", decision.reason);

    println!("=== Summary ===");
    match processor
        .process(&ProcessingRequest::summarise(THREAD), ProcessingMode::Hybrid)
        .await
    {
        Ok(result) => println!("{:#?}\nvia {:?}\n", result.output, result.route),
        Err(e) => println!("{}: {}\n", e.code, e.user_message),
    }

    println!("=== Drafts ===");
    let request = ProcessingRequest::draft(THREAD)
        .with_tone(Tone::Friendly)
        .with_guidance("Confirm attendance and mention no dietary needs");
    match processor.process(&request, ProcessingMode::Hybrid).await {
        Ok(ProcessingResult {
            output: ProcessingOutput::Drafts(drafts),
            ..
        }) => {
            for draft in drafts.iter() {
                println!("Subject: {}\n{}\n---", draft.subject, draft.body);
            }
        }
        Ok(other) => println!("{:?}", other.output),
        Err(e) => println!("{}: {}", e.code, e.user_message),
    }

    Ok(())
}
