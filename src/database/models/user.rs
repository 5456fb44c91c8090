use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How the user signs in: with a password or with a one-time code sent to a
/// verified email address or phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginPreference {
    Password,
    Email,
    Phone,
}

impl LoginPreference {
    pub const ALL: [LoginPreference; 3] = [LoginPreference::Password, LoginPreference::Email, LoginPreference::Phone];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginPreference::Password => "password",
            LoginPreference::Email => "email",
            LoginPreference::Phone => "phone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    /// Stored as text; see [`User::login_preference`]
    #[serde(skip)]
    #[sqlx(rename = "login_preference")]
    pub login_preference_raw: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Unknown stored values fall back to password sign-in
    pub fn login_preference(&self) -> LoginPreference {
        LoginPreference::parse(&self.login_preference_raw).unwrap_or(LoginPreference::Password)
    }

    pub fn has_verified_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty()) && self.email_verified_at.is_some()
    }

    pub fn has_verified_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.trim().is_empty()) && self.phone_verified_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: Some("ada@example.com".into()),
            phone: None,
            email_verified_at: None,
            phone_verified_at: None,
            login_preference_raw: "sms".into(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn unknown_preference_falls_back_to_password() {
        assert_eq!(user().login_preference(), LoginPreference::Password);
        assert_eq!(LoginPreference::parse("phone"), Some(LoginPreference::Phone));
        assert_eq!(LoginPreference::parse("Phone"), None);
    }

    #[test]
    fn verification_requires_value_and_timestamp() {
        let mut u = user();
        assert!(!u.has_verified_email());

        u.email_verified_at = Some(Utc::now());
        assert!(u.has_verified_email());

        u.phone_verified_at = Some(Utc::now());
        assert!(!u.has_verified_phone(), "verified timestamp without a number");
    }
}
