//! Core data models for cardcycle
//!
//! Accounts, credit cards, recurring series and transactions, plus the money
//! and ID types they share.

pub mod account;
pub mod credit_card;
pub mod ids;
pub mod money;
pub mod recurring;
pub mod transaction;

pub use account::{Account, AccountType};
pub use credit_card::CreditCard;
pub use ids::{AccountId, CardId, SeriesId, TransactionId};
pub use money::Money;
pub use recurring::{RecurringSeries, SeriesConfig};
pub use transaction::{Installment, PaymentSource, Transaction};
