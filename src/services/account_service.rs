use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LoginPreference, User};
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User {0} not found")]
    UserNotFound(Uuid),
    #[error("Email address must be verified before it can be used to sign in")]
    EmailNotVerified,
    #[error("Phone number must be verified before it can be used to sign in")]
    PhoneNotVerified,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// What the account security screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecuritySettings {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub login_preference: LoginPreference,
    /// Preferences the user may switch to right now
    pub available_preferences: Vec<LoginPreference>,
}

impl From<&User> for SecuritySettings {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            phone: user.phone.clone(),
            email_verified: user.has_verified_email(),
            phone_verified: user.has_verified_phone(),
            login_preference: user.login_preference(),
            available_preferences: LoginPreference::ALL
                .into_iter()
                .filter(|p| check_login_preference(user, *p).is_ok())
                .collect(),
        }
    }
}

/// A one-time-code preference is only allowed once its channel is verified
pub fn check_login_preference(user: &User, preference: LoginPreference) -> Result<(), AccountError> {
    match preference {
        LoginPreference::Password => Ok(()),
        LoginPreference::Email if user.has_verified_email() => Ok(()),
        LoginPreference::Email => Err(AccountError::EmailNotVerified),
        LoginPreference::Phone if user.has_verified_phone() => Ok(()),
        LoginPreference::Phone => Err(AccountError::PhoneNotVerified),
    }
}

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub async fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::pool().await?))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, AccountError> {
        let filter = FilterData {
            where_clause: Some(json!({ "id": user_id, "deleted_at": null })),
            ..Default::default()
        };
        Repository::<User>::new("users", self.pool.clone())
            .select_one(filter)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))
    }

    pub async fn security_settings(&self, user_id: Uuid) -> Result<SecuritySettings, AccountError> {
        let user = self.find_user(user_id).await?;
        Ok(SecuritySettings::from(&user))
    }

    pub async fn update_login_preference(
        &self,
        user_id: Uuid,
        preference: LoginPreference,
    ) -> Result<SecuritySettings, AccountError> {
        let user = self.find_user(user_id).await?;
        check_login_preference(&user, preference)?;

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET login_preference = $1, updated_at = now()
             WHERE id = $2 AND deleted_at IS NULL
             RETURNING *",
        )
        .bind(preference.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or(AccountError::UserNotFound(user_id))?;

        tracing::info!("User {} switched login preference to {}", user_id, preference.as_str());
        Ok(SecuritySettings::from(&updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email_verified: bool, phone: Option<&str>, phone_verified: bool) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: Some("ada@example.com".into()),
            phone: phone.map(str::to_string),
            email_verified_at: email_verified.then_some(now),
            phone_verified_at: phone_verified.then_some(now),
            login_preference_raw: "password".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn password_is_always_allowed() {
        assert!(check_login_preference(&user(false, None, false), LoginPreference::Password).is_ok());
    }

    #[test]
    fn email_requires_verification() {
        assert!(matches!(
            check_login_preference(&user(false, None, false), LoginPreference::Email),
            Err(AccountError::EmailNotVerified)
        ));
        assert!(check_login_preference(&user(true, None, false), LoginPreference::Email).is_ok());
    }

    #[test]
    fn phone_requires_number_and_verification() {
        assert!(matches!(
            check_login_preference(&user(true, Some("+15550100"), false), LoginPreference::Phone),
            Err(AccountError::PhoneNotVerified)
        ));
        assert!(check_login_preference(&user(true, None, true), LoginPreference::Phone).is_err());
        assert!(check_login_preference(&user(false, Some("+15550100"), true), LoginPreference::Phone).is_ok());
    }

    #[test]
    fn settings_list_available_preferences() {
        let settings = SecuritySettings::from(&user(true, Some("+15550100"), false));
        assert_eq!(settings.available_preferences, vec![LoginPreference::Password, LoginPreference::Email]);
        assert!(settings.email_verified);
        assert!(!settings.phone_verified);

        let body = serde_json::to_value(&settings).unwrap();
        assert_eq!(body["login_preference"], "password");
        assert_eq!(body["available_preferences"], json!(["password", "email"]));
    }
}
