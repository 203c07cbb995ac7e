//! Transaction model
//!
//! A transaction is paid either from an account or with a credit card.
//! Card purchases split into installments carry an installment marker, and
//! transactions produced from a recurring series remember the series id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CardId, SeriesId, TransactionId};
use super::money::Money;

/// Where the money for a transaction comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PaymentSource {
    Account(AccountId),
    Card(CardId),
}

impl PaymentSource {
    pub fn card_id(&self) -> Option<CardId> {
        match self {
            Self::Card(id) => Some(*id),
            Self::Account(_) => None,
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Account(id) => Some(*id),
            Self::Card(_) => None,
        }
    }
}

impl fmt::Display for PaymentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "{}", id),
            Self::Card(id) => write!(f, "{}", id),
        }
    }
}

/// Position of a transaction within an installment purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based installment number
    pub number: u32,
    pub total: u32,
}

impl fmt::Display for Installment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.total)
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub source: PaymentSource,

    pub date: NaiveDate,

    /// Positive for inflow, negative for outflow
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,

    /// Recurring series this transaction was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<SeriesId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(source: PaymentSource, date: NaiveDate, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            source,
            date,
            amount,
            description: String::new(),
            category: None,
            installment: None,
            series_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(
        source: PaymentSource,
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        let mut txn = Self::new(source, date, amount);
        txn.description = description.into();
        txn
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_installment(&self) -> bool {
        self.installment.is_some()
    }

    /// Description with the installment suffix, e.g. "Laptop (2/10)"
    pub fn display_description(&self) -> String {
        match self.installment {
            Some(installment) => format!("{} ({})", self.description, installment),
            None => self.description.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }

        if self.description.len() > 200 {
            return Err(TransactionValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        if let Some(installment) = self.installment {
            if installment.total == 0
                || installment.number == 0
                || installment.number > installment.total
            {
                return Err(TransactionValidationError::InvalidInstallment(installment));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.display_description(),
            self.amount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    DescriptionTooLong(usize),
    InvalidInstallment(Installment),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 200)", len)
            }
            Self::InvalidInstallment(i) => write!(f, "Invalid installment {}", i),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
