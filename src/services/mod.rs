//! Service layer for cardcycle
//!
//! Services hold the business rules on top of storage: validation,
//! uniqueness, cross-entity checks and audit logging. They are also the only
//! place where "today" enters the date-cycle calculator, always as an
//! explicit reference date passed in by the caller.

pub mod account;
pub mod card;
pub mod series;
pub mod transaction;

pub use account::{AccountService, AccountSummary};
pub use card::{CardService, CardUpdate, Invoice};
pub use series::{SeriesService, UpcomingCharge};
pub use transaction::{
    CreateTransactionInput, InstallmentPurchase, TransactionFilter, TransactionService,
};

use crate::error::{CycleError, CycleResult};
use crate::models::PaymentSource;
use crate::storage::Storage;

/// Check that a payment source exists and is not archived
pub(crate) fn ensure_source_usable(storage: &Storage, source: PaymentSource) -> CycleResult<()> {
    match source {
        PaymentSource::Account(id) => {
            let account = storage
                .accounts
                .get(id)?
                .ok_or_else(|| CycleError::account_not_found(id.to_string()))?;
            if account.archived {
                return Err(CycleError::Validation(format!(
                    "Account '{}' is archived",
                    account.name
                )));
            }
        }
        PaymentSource::Card(id) => {
            let card = storage
                .cards
                .get(id)?
                .ok_or_else(|| CycleError::card_not_found(id.to_string()))?;
            if card.archived {
                return Err(CycleError::Validation(format!(
                    "Card '{}' is archived",
                    card.name
                )));
            }
        }
    }

    Ok(())
}

/// Human-readable name of a payment source, falling back to its ID
pub fn source_name(storage: &Storage, source: PaymentSource) -> CycleResult<String> {
    let name = match source {
        PaymentSource::Account(id) => storage.accounts.get(id)?.map(|a| a.name),
        PaymentSource::Card(id) => storage.cards.get(id)?.map(|c| c.name),
    };

    Ok(name.unwrap_or_else(|| source.to_string()))
}
