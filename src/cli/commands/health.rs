use clap::Args;

use crate::cli::{utils, OutputFormat};

#[derive(Args, Debug)]
pub struct HealthArgs {
    #[arg(long, help = "Server base URL")]
    pub url: Option<String>,
}

pub async fn handle(args: HealthArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = utils::resolve_api_url(args.url);
    let response = reqwest::get(format!("{}/health", base)).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    let data = utils::unwrap_envelope(status, body)?;
    let message = format!(
        "{} is healthy (database: {})",
        base,
        data["database"].as_str().unwrap_or("unknown")
    );
    utils::output_success(&output_format, &message, Some(data))
}
