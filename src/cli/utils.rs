use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Resolve the server base URL: flag, then environment, then localhost
pub fn resolve_api_url(provided: Option<String>) -> String {
    provided
        .or_else(|| std::env::var("STOREFRONT_API_URL").ok())
        .unwrap_or_else(|| super::DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Unwrap the `{ success, data }` envelope, turning error bodies into errors
pub fn unwrap_envelope(status: reqwest::StatusCode, body: Value) -> anyhow::Result<Value> {
    if status.is_success() && body["success"] == json!(true) {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = body["message"].as_str().unwrap_or("request failed");
    match body["code"].as_str() {
        Some(code) => Err(anyhow::anyhow!("{} ({}, HTTP {})", message, code, status.as_u16())),
        None => Err(anyhow::anyhow!("{} (HTTP {})", message, status.as_u16())),
    }
}
