//! Transfer Core Types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::core_types::{TransferId, UserId};

/// Fractional digits kept by the ledger (`NUMERIC(15,2)`)
pub const VALUE_SCALE: u32 = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Value must be greater than zero")]
    NotPositive,

    #[error("Value has {provided} decimal places, max allowed {max}")]
    Precision { provided: u32, max: u32 },
}

/// Validated transfer value: strictly positive, at most [`VALUE_SCALE`] decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransferValue(Decimal);

impl TransferValue {
    pub fn new(value: Decimal) -> Result<Self, ValueError> {
        if value <= Decimal::ZERO {
            return Err(ValueError::NotPositive);
        }
        // 40.00 and 40 are the same amount
        let normalized = value.normalize();
        if normalized.scale() > VALUE_SCALE {
            return Err(ValueError::Precision {
                provided: normalized.scale(),
                max: VALUE_SCALE,
            });
        }
        // Same scale as the NUMERIC column, so every backend renders "40.00"
        let mut scaled = normalized;
        scaled.rescale(VALUE_SCALE);
        Ok(Self(scaled))
    }

    #[inline]
    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for TransferValue {
    type Error = ValueError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for TransferValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Completed transfer, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transfer {
    pub id: TransferId,
    pub payer_id: UserId,
    pub payee_id: UserId,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transfer {
    /// Build the record for a pending transfer; it is only persisted by the atomic unit
    pub fn new(payer_id: UserId, payee_id: UserId, value: TransferValue) -> Self {
        Self {
            id: TransferId::new(),
            payer_id,
            payee_id,
            value: value.amount(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Whether `user_id` is a party to this transfer
    pub fn involves(&self, user_id: UserId) -> bool {
        self.payer_id == user_id || self.payee_id == user_id
    }
}
