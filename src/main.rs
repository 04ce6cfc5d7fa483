//! Wallet Transfer service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌────────────┐    ┌────────────┐
//! │  Config  │───▶│ Logging  │───▶│   Stores   │───▶│  Gateway   │
//! │  (YAML)  │    │(tracing) │    │ (PG / mem) │    │  (axum)    │
//! └──────────┘    └──────────┘    └────────────┘    └────────────┘
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use wallet_transfer::authorization::{Authorizer, HttpAuthorizer};
use wallet_transfer::config::AppConfig;
use wallet_transfer::db::Database;
use wallet_transfer::gateway::{self, state::AppState};
use wallet_transfer::memory::MemoryStore;
use wallet_transfer::session::SessionVerifier;
use wallet_transfer::transfer::{
    AtomicTransfer, PgAtomicTransfer, PgTransferLedger, TransferEngine, TransferLedger,
};
use wallet_transfer::wallet::{PgWalletStore, WalletService, WalletStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

struct Stores {
    wallets: Arc<dyn WalletStore>,
    ledger: Arc<dyn TransferLedger>,
    atomic: Arc<dyn AtomicTransfer>,
    db: Option<Arc<Database>>,
}

async fn build_stores(config: &AppConfig) -> Result<Stores> {
    match &config.postgres_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.migrate().await.context("Failed to initialize schema")?;
            let pool = db.pool().clone();
            Ok(Stores {
                wallets: Arc::new(PgWalletStore::new(pool.clone())),
                ledger: Arc::new(PgTransferLedger::new(pool.clone())),
                atomic: Arc::new(PgAtomicTransfer::new(pool)),
                db: Some(Arc::new(db)),
            })
        }
        None => {
            tracing::warn!("No postgres_url configured, using in-memory store (state is lost on exit)");
            let store = Arc::new(MemoryStore::new());
            Ok(Stores {
                wallets: store.clone(),
                ledger: store.clone(),
                atomic: store,
                db: None,
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env).context("Failed to load configuration")?;
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }
    let _log_guard = wallet_transfer::logging::init_logging(&config);

    tracing::info!(
        env = %env,
        version = env!("GIT_HASH"),
        "Starting wallet transfer service"
    );

    let stores = build_stores(&config).await?;

    let authorizer: Arc<dyn Authorizer> = Arc::new(
        HttpAuthorizer::new(&config.authorizer).context("Failed to build authorization client")?,
    );
    let engine = Arc::new(TransferEngine::new(
        stores.wallets.clone(),
        authorizer,
        stores.atomic,
    ));
    let wallets = Arc::new(WalletService::new(stores.wallets));
    let sessions = Arc::new(SessionVerifier::new(&config.session));

    let mut state = AppState::new(
        engine,
        wallets,
        stores.ledger,
        sessions,
        config.gateway.request_timeout(),
    );
    if let Some(db) = stores.db {
        state = state.with_database(db);
    }

    gateway::run_server(&config.gateway, Arc::new(state))
        .await
        .context("Gateway server error")?;
    Ok(())
}
