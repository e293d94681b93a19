use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// Per-category interest flags chosen at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub academic: bool,
    pub sports: bool,
    pub cultural: bool,
    pub technology: bool,
    pub workshops: bool,
    pub social: bool,
}

impl Preferences {
    /// Category names the user opted into, in declaration order.
    pub fn selected(&self) -> Vec<&'static str> {
        [
            ("academic", self.academic),
            ("sports", self.sports),
            ("cultural", self.cultural),
            ("technology", self.technology),
            ("workshops", self.workshops),
            ("social", self.social),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub preferences: Json<Preferences>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(full_name: String, email: String, password_hash: String, preferences: Preferences) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name,
            email: normalize_email(&email),
            password_hash,
            preferences: Json(preferences),
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Emails are matched case-insensitively; the stored form is trimmed lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub preferences: Preferences,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            preferences: user.preferences.0,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Creator details attached to listed events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}
