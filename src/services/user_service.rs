use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::auth::{AdminAllowList, AuthError, PasswordHashing, TokenService};
use crate::database::models::{normalize_email, Preferences, User, UserProfile};
use crate::database::{DatabaseError, UserRepository};

use super::{ServiceError, ServiceResult};

/// Body of POST /api/auth/register. Missing strings fail validation rather than parsing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Registration {
    #[validate(custom(function = "validate_full_name"))]
    pub full_name: String,
    #[validate(custom(function = "validate_registration_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub preferences: Preferences,
}

/// Body of POST /api/auth/login.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Credentials {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn validate_full_name(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required").with_message("Full name is required".into()));
    }
    Ok(())
}

/// Checks the address as it will be stored, so surrounding whitespace is accepted.
fn validate_registration_email(value: &str) -> Result<(), validator::ValidationError> {
    if !normalize_email(value).validate_email() {
        return Err(validator::ValidationError::new("email").with_message("A valid email is required".into()));
    }
    Ok(())
}

/// Token plus the profile it was issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
    pub email: String,
    pub in_admin_list: bool,
}

/// Account lifecycle: registration, login, profile and admin management.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    passwords: PasswordHashing,
    admins: AdminAllowList,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        passwords: PasswordHashing,
        admins: AdminAllowList,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
            admins,
        }
    }

    pub fn admins(&self) -> &AdminAllowList {
        &self.admins
    }

    /// Round-trip to the backing store.
    pub async fn ping(&self) -> ServiceResult<()> {
        Ok(self.users.ping().await?)
    }

    pub async fn register(&self, input: Registration) -> ServiceResult<AuthSession> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = User::new(
            input.full_name.trim().to_string(),
            email,
            password_hash,
            input.preferences,
        );

        // The unique index still catches a registration racing this one.
        let user = match self.users.create(user).await {
            Ok(user) => user,
            Err(DatabaseError::Duplicate(_)) => return Err(ServiceError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, "user registered");
        self.session(user)
    }

    pub async fn login(&self, credentials: Credentials) -> ServiceResult<AuthSession> {
        let email = normalize_email(&credentials.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.verify_password(credentials.password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        self.session(user)
    }

    pub async fn find(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Stored flag or allow-list membership of the current record.
    pub async fn is_admin(&self, id: Uuid) -> ServiceResult<bool> {
        let user = self.find(id).await?;
        Ok(self.admins.is_admin(&user))
    }

    /// A user may act on their own account; admins may act on any.
    pub async fn ensure_self_or_admin(&self, requester: Uuid, target: Uuid) -> ServiceResult<()> {
        if requester == target || self.is_admin(requester).await? {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    pub async fn get_profile(&self, id: Uuid) -> ServiceResult<UserProfile> {
        self.find(id).await.map(UserProfile::from)
    }

    pub async fn update_preferences(&self, id: Uuid, preferences: Preferences) -> ServiceResult<UserProfile> {
        let user = self
            .users
            .update_preferences(id, preferences)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        info!(user_id = %id, selected = ?preferences.selected(), "preferences updated");
        Ok(user.into())
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<UserProfile>> {
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .map(UserProfile::from)
            .collect())
    }

    /// Registrations referencing the user are left in place.
    pub async fn delete_user(&self, id: Uuid) -> ServiceResult<()> {
        if !self.users.delete(id).await? {
            return Err(ServiceError::UserNotFound);
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub async fn promote_admin(&self, email: &str) -> ServiceResult<UserProfile> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ServiceError::Validation("Email is required".to_string()));
        }
        let user = self
            .users
            .set_admin(&email, true)
            .await?
            .ok_or(ServiceError::UserNotFound)?;
        info!(user_id = %user.id, "user promoted to admin");
        Ok(user.into())
    }

    /// Creates an admin account, or promotes the existing account with that email.
    /// Returns the profile and whether a new account was created.
    pub async fn ensure_admin(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<(UserProfile, bool)> {
        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return self.promote_admin(&email).await.map(|profile| (profile, false));
        }

        let password_hash = self.hash_password(password.to_string()).await?;
        let mut user = User::new(full_name.trim().to_string(), email, password_hash, Preferences::default());
        user.is_admin = true;
        let user = self.users.create(user).await?;
        info!(user_id = %user.id, "admin account created");
        Ok((user.into(), true))
    }

    pub async fn admin_status(&self, id: Uuid) -> ServiceResult<AdminStatus> {
        let user = self.find(id).await?;
        Ok(AdminStatus {
            is_admin: self.admins.is_admin(&user),
            in_admin_list: self.admins.contains(&user.email),
            email: user.email,
        })
    }

    fn session(&self, user: User) -> ServiceResult<AuthSession> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession {
            token,
            user: user.into(),
        })
    }

    // Argon2 is CPU bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(ServiceError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> ServiceResult<bool> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(ServiceError::from)
    }
}
