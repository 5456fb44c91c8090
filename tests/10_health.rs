mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_missing_database() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/health")).await?;
    let (status, body) = common::read_json(res).await?;

    // The test server runs without DATABASE_URL
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn index_is_public() -> Result<()> {
    let server = common::ensure_server().await?;

    let (status, body) = common::read_json(reqwest::get(server.url("/")).await?).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Storefront Admin API");
    Ok(())
}
