use std::sync::Arc;
use std::time::Duration;

use crate::db::Database;
use crate::session::SessionVerifier;
use crate::transfer::{TransferEngine, TransferLedger};
use crate::wallet::WalletService;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
    pub wallets: Arc<WalletService>,
    /// Read side of the transfer ledger
    pub ledger: Arc<dyn TransferLedger>,
    pub sessions: Arc<SessionVerifier>,
    /// PostgreSQL database, pinged by the health check when configured
    pub pg_db: Option<Arc<Database>>,
    /// Deadline for one engine call
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        engine: Arc<TransferEngine>,
        wallets: Arc<WalletService>,
        ledger: Arc<dyn TransferLedger>,
        sessions: Arc<SessionVerifier>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            wallets,
            ledger,
            sessions,
            pg_db: None,
            request_timeout,
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.pg_db = Some(db);
        self
    }
}
