//! Credit card model
//!
//! A card is defined by the day its invoice closes and the day the invoice is
//! due. The date arithmetic lives in [`crate::cycle`]; this type only stores
//! and validates the configuration.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CardId;
use super::money::Money;
use crate::cycle::{CardCycle, InvoiceAssignment};

/// A credit card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,

    pub name: String,

    /// Day of month the invoice closes (1-31)
    pub closing_day: u32,

    /// Day of month the invoice is due (1-31)
    pub due_day: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn new(name: impl Into<String>, closing_day: u32, due_day: u32) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            name: name.into(),
            closing_day,
            due_day,
            credit_limit: None,
            archived: false,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The card's closing/due configuration
    pub fn cycle(&self) -> CardCycle {
        CardCycle::new(self.closing_day, self.due_day)
    }

    /// Invoice a purchase made on `reference` would be billed on
    pub fn assignment(&self, reference: NaiveDate) -> InvoiceAssignment {
        self.cycle().assignment(reference)
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(CardValidationError::NameTooLong(self.name.len()));
        }

        if !(1..=31).contains(&self.closing_day) {
            return Err(CardValidationError::InvalidClosingDay(self.closing_day));
        }

        if !(1..=31).contains(&self.due_day) {
            return Err(CardValidationError::InvalidDueDay(self.due_day));
        }

        if let Some(limit) = self.credit_limit {
            if limit.is_negative() {
                return Err(CardValidationError::NegativeLimit);
            }
        }

        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (closes {}, due {})",
            self.name, self.closing_day, self.due_day
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidClosingDay(u32),
    InvalidDueDay(u32),
    NegativeLimit,
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Card name too long ({} chars, max 100)", len),
            Self::InvalidClosingDay(day) => {
                write!(f, "Closing day must be between 1 and 31 (got {})", day)
            }
            Self::InvalidDueDay(day) => {
                write!(f, "Due day must be between 1 and 31 (got {})", day)
            }
            Self::NegativeLimit => write!(f, "Credit limit cannot be negative"),
        }
    }
}

impl std::error::Error for CardValidationError {}
