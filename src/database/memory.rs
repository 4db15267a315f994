use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{RefreshToken, User};
use crate::database::store::{SettingStore, TimelineTx, UserStore};
use crate::timeline::{ChangeSet, SettingRecord};

/// Timeline kept in process memory, for development runs and tests.
///
/// A unit of work owns the write half of the lock; changes are only applied in
/// `commit`, so a dropped transaction leaves the timeline untouched.
#[derive(Clone, Default)]
pub struct MemorySettingStore {
    records: Arc<RwLock<Vec<SettingRecord>>>,
}

impl MemorySettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SettingRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl SettingStore for MemorySettingStore {
    async fn snapshot(&self) -> Result<Vec<SettingRecord>, DatabaseError> {
        Ok(self.records.read().await.clone())
    }

    async fn begin(&self) -> Result<Box<dyn TimelineTx>, DatabaseError> {
        let guard = self.records.clone().write_owned().await;
        Ok(Box::new(MemoryTimelineTx { guard }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

struct MemoryTimelineTx {
    guard: OwnedRwLockWriteGuard<Vec<SettingRecord>>,
}

#[async_trait]
impl TimelineTx for MemoryTimelineTx {
    fn records(&self) -> &[SettingRecord] {
        &self.guard
    }

    async fn commit(self: Box<Self>, changes: &ChangeSet, active: Option<Uuid>) -> Result<(), DatabaseError> {
        let mut guard = self.guard;
        changes.apply(&mut guard);
        for record in guard.iter_mut() {
            record.is_active = Some(record.id) == active;
        }
        Ok(())
    }
}

/// Accounts and refresh tokens kept in process memory.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict(format!("user '{}' already exists", user.username)));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn store_refresh_token(&self, token: &RefreshToken) -> Result<(), DatabaseError> {
        self.tokens
            .lock()
            .await
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn consume_refresh_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, DatabaseError> {
        let mut tokens = self.tokens.lock().await;
        match tokens.get_mut(token_hash) {
            Some(token) if token.is_usable(now) => {
                token.revoked_at = Some(now);
                Ok(Some(token.user_id))
            }
            _ => Ok(None),
        }
    }

    async fn revoke_refresh_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DatabaseError> {
        let mut tokens = self.tokens.lock().await;
        match tokens.get_mut(token_hash) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
