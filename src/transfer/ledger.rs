//! Transfer ledger
//!
//! Append-only store of completed transfers. Rows are inserted only by the
//! atomic unit, through [`insert_transfer`] on the unit's own transaction.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use super::types::Transfer;
use crate::core_types::{TransferId, UserId};
use crate::db::StoreError;

/// Read side of the ledger
#[async_trait]
pub trait TransferLedger: Send + Sync {
    async fn get(&self, id: TransferId) -> Result<Option<Transfer>, StoreError>;

    /// Transfers where `user_id` is payer or payee, newest first
    async fn list_for_user(&self, user_id: UserId, limit: i64)
    -> Result<Vec<Transfer>, StoreError>;
}

/// PostgreSQL-backed ledger reads
pub struct PgTransferLedger {
    pool: PgPool,
}

impl PgTransferLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_transfer(row: &PgRow) -> Result<Transfer, StoreError> {
    let id: uuid::Uuid = row.try_get("id")?;
    Ok(Transfer {
        id: TransferId::from(id),
        payer_id: row.try_get("payer_id")?,
        payee_id: row.try_get("payee_id")?,
        value: row.try_get("value")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl TransferLedger for PgTransferLedger {
    async fn get(&self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        let row = sqlx::query(
            r#"SELECT id, payer_id, payee_id, value, created_at, updated_at, deleted_at
               FROM transfers WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id.inner())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_transfer).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Transfer>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT id, payer_id, payee_id, value, created_at, updated_at, deleted_at
               FROM transfers
               WHERE (payer_id = $1 OR payee_id = $1) AND deleted_at IS NULL
               ORDER BY created_at DESC
               LIMIT $2"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_transfer).collect()
    }
}

/// Insert one transfer record inside the caller's transaction
pub async fn insert_transfer(conn: &mut PgConnection, transfer: &Transfer) -> Result<(), StoreError> {
    sqlx::query(
        r#"INSERT INTO transfers (id, payer_id, payee_id, value, created_at)
           VALUES ($1, $2, $3, $4, $5)"#,
    )
    .bind(transfer.id.inner())
    .bind(transfer.payer_id)
    .bind(transfer.payee_id)
    .bind(transfer.value)
    .bind(transfer.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
