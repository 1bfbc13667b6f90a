//! Credit ledger arithmetic.
//!
//! Balances are only ever changed through signed ledger deltas. A debit is
//! admitted only after the caller has read the balance under a row lock, and
//! the storage layer guards the update again so a negative balance is never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Credits;

/// Credits granted to every account at signup. Not recorded in the ledger,
/// so `sum(deltas) == balance - STARTING_GRANT` holds for every user.
pub const STARTING_GRANT: Credits = 20;

/// Why a ledger entry was written. Matches the `reason` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerReason {
    /// Seat purchase at booking confirmation.
    BookingDebit,
    /// Credits returned when a confirmed booking is cancelled.
    BookingRefund,
}

impl LedgerReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookingDebit => "booking_debit",
            Self::BookingRefund => "booking_refund",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "booking_debit" => Some(Self::BookingDebit),
            "booking_refund" => Some(Self::BookingRefund),
            _ => None,
        }
    }
}

/// Signed delta for a debit of `amount`.
pub fn debit(amount: Credits) -> Credits {
    -amount
}

/// Signed delta for a credit of `amount`.
pub fn credit(amount: Credits) -> Credits {
    amount
}

/// Check that `balance` covers a debit of `amount`.
pub fn ensure_sufficient(balance: Credits, amount: Credits) -> Result<(), CoreError> {
    if balance < amount {
        return Err(CoreError::InsufficientCredits {
            required: amount,
            available: balance,
        });
    }
    Ok(())
}

/// Balance after applying `delta`, or `None` if it would go negative or overflow.
pub fn apply(balance: Credits, delta: Credits) -> Option<Credits> {
    balance.checked_add(delta).filter(|b| *b >= 0)
}
