use clap::Args;
use serde_json::{json, Value};

use crate::cli::{utils, OutputFormat};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(help = "Search term (at least two characters)")]
    pub query: String,

    #[arg(long, help = "Server base URL")]
    pub url: Option<String>,

    #[arg(long, env = "STOREFRONT_TOKEN", help = "Bearer token (see `console token`)")]
    pub token: Option<String>,
}

pub async fn handle(args: SearchArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = utils::resolve_api_url(args.url);
    let token = args
        .token
        .ok_or_else(|| anyhow::anyhow!("No token given; pass --token or set STOREFRONT_TOKEN"))?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/search", base))
        .bearer_auth(token)
        .json(&json!({ "query": args.query }))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;
    let data = utils::unwrap_envelope(status, body)?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => print_groups(&data),
    }
    Ok(())
}

fn print_groups(data: &Value) {
    let total = data["total_count"].as_u64().unwrap_or(0);
    println!("{} result(s) for {:?}", total, data["query"].as_str().unwrap_or_default());

    if let Some(groups) = data["results"].as_object() {
        for group in groups.values() {
            println!();
            println!("{} ({})", group["name"].as_str().unwrap_or_default(), group["count"]);
            for item in group["items"].as_array().into_iter().flatten() {
                let title = item["title"].as_str().unwrap_or_default();
                let url = item["url"].as_str().unwrap_or_default();
                match item["subtitle"].as_str() {
                    Some(subtitle) => println!("  {}  {}  {}", title, subtitle, url),
                    None => println!("  {}  {}", title, url),
                }
            }
        }
    }
}
