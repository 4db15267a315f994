pub mod password;
pub mod tokens;

use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::{RefreshToken, Role, User};
use crate::database::{DatabaseError, UserStore};

pub use tokens::{Claims, TokenKeys};

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Refresh token is invalid, expired or already used")]
    InvalidRefreshToken,

    #[error("{0}")]
    Token(String),

    #[error("{0}")]
    Validation(String),

    #[error("Authentication misconfigured: {0}")]
    Config(&'static str),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Credentials returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// Password login, access tokens and single-use refresh tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, security: &SecurityConfig) -> Result<Self, AuthError> {
        Ok(Self {
            users,
            keys: TokenKeys::from_secret(&security.jwt_secret)?,
            access_ttl: Duration::minutes(security.access_token_minutes),
            refresh_ttl: Duration::days(security.refresh_token_days),
            bcrypt_cost: security.bcrypt_cost,
        })
    }

    pub fn verify(&self, access_token: &str) -> Result<Claims, AuthError> {
        self.keys.verify(access_token)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                warn!("Login failed for unknown user '{}'", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !password::verify(password, &user.password_hash).await? {
            warn!("Login failed for '{}': wrong password", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        info!("User '{}' logged in", user.username);
        self.issue(user).await
    }

    /// Trade a refresh token for a new pair. The presented token is spent.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let user_id = self
            .users
            .consume_refresh_token(&tokens::digest(refresh_token), now)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.issue(user).await
    }

    /// Revoke a refresh token; returns whether it was still live.
    pub async fn logout(&self, refresh_token: &str) -> Result<bool, AuthError> {
        Ok(self
            .users
            .revoke_refresh_token(&tokens::digest(refresh_token), Utc::now())
            .await?)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> Result<User, AuthError> {
        let username = username.trim();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username.chars().count()) {
            return Err(AuthError::Validation(format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password::hash(password, self.bcrypt_cost).await?,
            role,
            created_at: Utc::now(),
        };
        self.users.insert_user(&user).await?;

        info!("Created {} account '{}'", user.role, user.username);
        Ok(user)
    }

    /// Create the configured admin account unless the username is taken.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(false);
        }
        self.create_user(username, password, Role::Admin).await?;
        Ok(true)
    }

    async fn issue(&self, user: User) -> Result<TokenPair, AuthError> {
        let access_token = self.keys.sign(&Claims::for_user(&user, self.access_ttl))?;

        let refresh_token = tokens::new_refresh_token();
        let now = Utc::now();
        self.users
            .store_refresh_token(&RefreshToken {
                token_hash: tokens::digest(&refresh_token),
                user_id: user.id,
                expires_at: now + self.refresh_ttl,
                revoked_at: None,
                created_at: now,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.access_ttl.num_seconds(),
            user,
        })
    }
}
