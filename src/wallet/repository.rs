//! Repository layer for wallet rows

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use super::models::{Wallet, WalletType};
use crate::core_types::UserId;
use crate::db::StoreError;

/// Wallet store contract
///
/// Reads never mutate. Balance changes are not exposed here: they only
/// happen inside the atomic transfer unit via [`apply_balance_delta`].
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Get the live (not soft-deleted) wallet owned by `user_id`
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Wallet>, StoreError>;

    /// Insert a new wallet; fails with `AlreadyExists` if the user has one
    async fn create(&self, wallet: &Wallet) -> Result<(), StoreError>;
}

/// PostgreSQL-backed wallet store
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_wallet(row: &PgRow) -> Result<Wallet, StoreError> {
    let type_id: i16 = row.try_get("wallet_type")?;
    let wallet_type = WalletType::from_id(type_id)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown wallet_type {}", type_id)))?;

    Ok(Wallet {
        user_id: row.try_get("user_id")?,
        wallet_type,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<Wallet>, StoreError> {
        let row = sqlx::query(
            r#"SELECT user_id, wallet_type, balance, created_at, updated_at, deleted_at
               FROM wallets WHERE user_id = $1 AND deleted_at IS NULL"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_wallet).transpose()
    }

    async fn create(&self, wallet: &Wallet) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"INSERT INTO wallets (user_id, wallet_type, balance, created_at)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (user_id) DO NOTHING"#,
        )
        .bind(wallet.user_id)
        .bind(wallet.wallet_type.id())
        .bind(wallet.balance)
        .bind(wallet.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists(wallet.user_id));
        }
        Ok(())
    }
}

/// Lock the given wallet rows for the rest of the enclosing transaction.
///
/// Rows are locked in `user_id` order so two transfers over the same pair in
/// opposite directions acquire locks in the same sequence.
pub async fn lock_wallets(conn: &mut PgConnection, user_ids: &[UserId]) -> Result<(), StoreError> {
    let mut ids = user_ids.to_vec();
    ids.sort();
    ids.dedup();

    let locked: Vec<UserId> = sqlx::query_scalar(
        r#"SELECT user_id FROM wallets
           WHERE user_id = ANY($1) AND deleted_at IS NULL
           ORDER BY user_id
           FOR UPDATE"#,
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await?;

    if let Some(missing) = ids.iter().find(|id| !locked.contains(id)) {
        return Err(StoreError::WalletNotFound(*missing));
    }
    Ok(())
}

/// Add a signed `delta` to a wallet balance inside the caller's transaction.
///
/// The update is guarded so a committed balance can never go negative: zero
/// affected rows means either the wallet vanished or the debit is too large.
pub async fn apply_balance_delta(
    conn: &mut PgConnection,
    user_id: UserId,
    delta: Decimal,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"UPDATE wallets
           SET balance = balance + $1, updated_at = NOW()
           WHERE user_id = $2 AND deleted_at IS NULL AND balance + $1 >= 0"#,
    )
    .bind(delta)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return if delta.is_sign_negative() {
            Err(StoreError::BalanceConstraint(user_id))
        } else {
            Err(StoreError::WalletNotFound(user_id))
        };
    }
    Ok(())
}
