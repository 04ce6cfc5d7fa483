//! Data models for wallets

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core_types::UserId;
use crate::transfer::types::VALUE_SCALE;

/// Wallet type
///
/// Stored as `SMALLINT`. Merchant wallets can receive but never pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i16)]
pub enum WalletType {
    Common = 1,
    Merchant = 2,
}

impl WalletType {
    /// Get numeric ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(WalletType::Common),
            2 => Some(WalletType::Merchant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Common => "COMMON",
            WalletType::Merchant => "MERCHANT",
        }
    }

    /// Whether wallets of this type may act as payer
    pub fn can_pay(&self) -> bool {
        matches!(self, WalletType::Common)
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WalletType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COMMON" | "1" => Ok(WalletType::Common),
            "MERCHANT" | "2" => Ok(WalletType::Merchant),
            _ => Err(format!("Invalid wallet type: {}", s)),
        }
    }
}

/// Per-user wallet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub wallet_type: WalletType,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// New wallet with zero balance
    pub fn new(user_id: UserId, wallet_type: WalletType) -> Self {
        Self::with_balance(user_id, wallet_type, Decimal::new(0, VALUE_SCALE))
    }

    pub fn with_balance(user_id: UserId, wallet_type: WalletType, balance: Decimal) -> Self {
        Self {
            user_id,
            wallet_type,
            balance,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn covers(&self, value: Decimal) -> bool {
        self.balance >= value
    }
}
