//! PostgreSQL schema for wallets and the transfer ledger
//!
//! Amounts use `NUMERIC(15,2)`; the `CHECK` constraints back up the
//! guarded balance update in the atomic transfer unit.

pub const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    user_id     UUID PRIMARY KEY,
    wallet_type SMALLINT NOT NULL,
    balance     NUMERIC(15, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NULL,
    deleted_at  TIMESTAMPTZ NULL
)
"#;

pub const CREATE_WALLETS_TYPE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_wallets_wallet_type ON wallets (wallet_type)";

pub const CREATE_WALLETS_DELETED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_wallets_deleted_at ON wallets (deleted_at)";

pub const CREATE_TRANSFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transfers (
    id          UUID PRIMARY KEY,
    payer_id    UUID NOT NULL REFERENCES wallets (user_id),
    payee_id    UUID NOT NULL REFERENCES wallets (user_id),
    value       NUMERIC(15, 2) NOT NULL CHECK (value > 0),
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NULL,
    deleted_at  TIMESTAMPTZ NULL,
    CHECK (payer_id <> payee_id)
)
"#;

pub const CREATE_TRANSFERS_PAYER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transfers_payer_id ON transfers (payer_id)";

pub const CREATE_TRANSFERS_PAYEE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transfers_payee_id ON transfers (payee_id)";

pub const CREATE_TRANSFERS_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transfers_created_at ON transfers (created_at)";

/// Executed in order by [`super::Database::migrate`]
pub const STATEMENTS: &[&str] = &[
    CREATE_WALLETS_TABLE,
    CREATE_WALLETS_TYPE_INDEX,
    CREATE_WALLETS_DELETED_INDEX,
    CREATE_TRANSFERS_TABLE,
    CREATE_TRANSFERS_PAYER_INDEX,
    CREATE_TRANSFERS_PAYEE_INDEX,
    CREATE_TRANSFERS_CREATED_INDEX,
];
