use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::store::{SettingStore, TimelineTx};
use crate::timeline::{ChangeSet, SettingRecord};

const SELECT_ALL: &str = r#"
    SELECT id, monthly_limit, description, valid_from, valid_until,
           is_active, created_by, created_at, updated_at
    FROM minijob_settings
"#;

/// PostgreSQL-backed timeline store.
///
/// Writers serialize on `LOCK TABLE ... IN SHARE ROW EXCLUSIVE MODE`: the mode
/// conflicts with itself and with row writes, but not with plain `SELECT`, so
/// readers keep going on their MVCC snapshot while a mutation is in flight.
#[derive(Clone)]
pub struct PgSettingStore {
    pool: PgPool,
}

impl PgSettingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for PgSettingStore {
    async fn snapshot(&self) -> Result<Vec<SettingRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, SettingRecord>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn begin(&self) -> Result<Box<dyn TimelineTx>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE minijob_settings IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let records = sqlx::query_as::<_, SettingRecord>(SELECT_ALL)
            .fetch_all(&mut *tx)
            .await?;

        debug!("Locked minijob_settings ({} records)", records.len());
        Ok(Box::new(PgTimelineTx { tx, records }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

struct PgTimelineTx {
    tx: Transaction<'static, Postgres>,
    records: Vec<SettingRecord>,
}

#[async_trait]
impl TimelineTx for PgTimelineTx {
    fn records(&self) -> &[SettingRecord] {
        &self.records
    }

    async fn commit(self: Box<Self>, changes: &ChangeSet, active: Option<Uuid>) -> Result<(), DatabaseError> {
        let PgTimelineTx { mut tx, .. } = *self;

        for record in &changes.inserts {
            sqlx::query(
                r#"
                INSERT INTO minijob_settings
                    (id, monthly_limit, description, valid_from, valid_until,
                     is_active, created_by, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, false, $6, $7, $8)
                "#,
            )
            .bind(record.id)
            .bind(record.monthly_limit)
            .bind(&record.description)
            .bind(record.valid_from)
            .bind(record.valid_until)
            .bind(record.created_by)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_write(e, "setting"))?;
        }

        for record in &changes.updates {
            let result = sqlx::query(
                r#"
                UPDATE minijob_settings
                SET monthly_limit = $2, description = $3, valid_from = $4,
                    valid_until = $5, updated_at = $6
                WHERE id = $1
                "#,
            )
            .bind(record.id)
            .bind(record.monthly_limit)
            .bind(&record.description)
            .bind(record.valid_from)
            .bind(record.valid_until)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(DatabaseError::NotFound(format!("setting {}", record.id)));
            }
        }

        for id in &changes.deletes {
            sqlx::query("DELETE FROM minijob_settings WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE minijob_settings
            SET is_active = COALESCE(id = $1, false)
            WHERE is_active IS DISTINCT FROM COALESCE(id = $1, false)
            "#,
        )
        .bind(active)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
