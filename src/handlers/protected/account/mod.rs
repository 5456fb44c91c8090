// handlers/protected/account/mod.rs - Account security of the calling user
//
// GET /api/account/security
// PUT /api/account/security/login-preference

use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::LoginPreference;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{AccountService, SecuritySettings};

#[derive(Debug, Deserialize)]
pub struct LoginPreferenceUpdate {
    /// Kept untyped so a wrong JSON type reports on the field itself
    #[serde(default)]
    pub login_preference: Option<Value>,
}

pub async fn security_get(Extension(auth_user): Extension<AuthUser>) -> ApiResult<SecuritySettings> {
    let settings = AccountService::new()
        .await?
        .security_settings(auth_user.user_id)
        .await?;
    Ok(ApiResponse::success(settings))
}

pub async fn login_preference_put(
    Extension(auth_user): Extension<AuthUser>,
    body: Result<Json<LoginPreferenceUpdate>, JsonRejection>,
) -> ApiResult<SecuritySettings> {
    let Json(body) = body?;
    let requested = body.login_preference.as_ref().and_then(Value::as_str);
    let preference = parse_preference(requested.unwrap_or_default())?;

    let settings = AccountService::new()
        .await?
        .update_login_preference(auth_user.user_id, preference)
        .await?;
    Ok(ApiResponse::success(settings))
}

fn parse_preference(value: &str) -> Result<LoginPreference, ApiError> {
    LoginPreference::parse(value.trim()).ok_or_else(|| {
        let allowed: Vec<&str> = LoginPreference::ALL.iter().map(LoginPreference::as_str).collect();
        ApiError::unprocessable_field(
            "Invalid login preference",
            "login_preference",
            format!("Must be one of: {}", allowed.join(", ")),
        )
    })
}
