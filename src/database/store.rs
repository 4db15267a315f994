use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{RefreshToken, User};
use crate::timeline::{ChangeSet, SettingRecord};

/// Persistence for the setting timeline.
///
/// Reads go through [`SettingStore::snapshot`]; every write goes through a
/// [`TimelineTx`] obtained from [`SettingStore::begin`], which holds exclusive
/// write access to the whole collection until it is committed or dropped.
#[async_trait]
pub trait SettingStore: Send + Sync {
    /// Consistent copy of every record, unordered.
    async fn snapshot(&self) -> Result<Vec<SettingRecord>, DatabaseError>;

    /// Start a unit of work. Dropping it without `commit` discards it.
    async fn begin(&self) -> Result<Box<dyn TimelineTx>, DatabaseError>;

    /// Cheap connectivity check used by `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Locked view of the timeline taken at `begin`.
#[async_trait]
pub trait TimelineTx: Send {
    /// Records as they were when the lock was taken.
    fn records(&self) -> &[SettingRecord];

    /// Write `changes`, flag `active` as the only active record, and release
    /// the lock. Either everything is persisted or nothing is.
    async fn commit(self: Box<Self>, changes: &ChangeSet, active: Option<Uuid>) -> Result<(), DatabaseError>;
}

/// Accounts and refresh tokens.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError>;

    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), DatabaseError>;

    /// Revoke a usable token and return its owner; `None` if the token is
    /// unknown, expired or already revoked.
    async fn consume_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, DatabaseError>;

    /// Revoke a token; returns whether a live token was revoked.
    async fn revoke_refresh_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DatabaseError>;
}
