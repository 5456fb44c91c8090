mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn requests_listing_is_an_empty_page() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/requests?per_page=5"))
        .bearer_auth(common::token_with(&[]))
        .send()
        .await?;
    let (status, body) = common::read_json(res).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "items": [], "page": 1, "per_page": 5, "total": 0, "last_page": 1 })
    );
    Ok(())
}

#[tokio::test]
async fn requests_writes_are_not_implemented() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::token_with(&["*"]);

    let create = client.post(server.url("/api/requests")).bearer_auth(&token).send().await?;
    assert_eq!(create.status(), StatusCode::NOT_IMPLEMENTED);

    let (status, body) = common::read_json(
        client.delete(server.url("/api/requests/42")).bearer_auth(&token).send().await?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["code"], "NOT_IMPLEMENTED");
    Ok(())
}

#[tokio::test]
async fn zero_page_is_a_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let token = common::token_with(&["categories.view"]);

    let res = client.get(server.url("/api/categories?page=0")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(server.url("/api/notifications?per_page=0")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_login_preference_is_unprocessable() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .put(server.url("/api/account/security/login-preference"))
        .bearer_auth(common::token_with(&[]))
        .json(&json!({ "login_preference": "fax" }))
        .send()
        .await?;
    let (status, body) = common::read_json(res).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"]["login_preference"].is_string());
    Ok(())
}
