//! `liveid verify` — submits a reference image and a selfie directly to the
//! verification API, bypassing the liveness flow. Useful for smoke-testing
//! an endpoint and key.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use liveid_flow::{Config, VerificationBackend, VerifyApiClient};

#[derive(Args)]
pub struct VerifyArgs {
    /// Reference face image: a local file path or an http(s) URL
    #[arg(long)]
    reference: String,

    /// Selfie (candidate) image file
    #[arg(long)]
    selfie: PathBuf,

    /// Reference identifier from the OCR step
    #[arg(long)]
    reference_id: String,

    /// Verification endpoint (defaults to LIVEID_VERIFY_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// API key (defaults to LIVEID_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

pub async fn run(args: VerifyArgs) -> Result<()> {
    let config = Config::from_env();
    let endpoint = args.endpoint.unwrap_or(config.verify_endpoint);
    let api_key = args.api_key.unwrap_or(config.api_key);

    let client = VerifyApiClient::new(&endpoint, &api_key)?;

    let reference = if args.reference.starts_with("http://") || args.reference.starts_with("https://")
    {
        let url = reqwest::Url::parse(&args.reference)
            .with_context(|| format!("invalid reference URL: {}", args.reference))?;
        println!("downloading reference image from {url}...");
        client.fetch_reference_image(&url).await?
    } else {
        std::fs::read(&args.reference)
            .with_context(|| format!("failed to read {}", args.reference))?
    };

    let selfie = std::fs::read(&args.selfie)
        .with_context(|| format!("failed to read {}", args.selfie.display()))?;

    println!(
        "submitting verification (reference {} bytes, selfie {} bytes)...",
        reference.len(),
        selfie.len()
    );

    let result = client
        .submit(&reference, &selfie, &args.reference_id)
        .await
        .context("verification request failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
