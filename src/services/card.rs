//! Credit card service
//!
//! Card CRUD plus the invoice questions users actually ask: which invoice a
//! purchase lands on, when it is due, which card to use today, and how much
//! an invoice adds up to.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::cycle::{self, InvoiceAssignment, YearMonth};
use crate::error::{CycleError, CycleResult};
use crate::models::{CardId, CreditCard, Money, PaymentSource, Transaction};
use crate::storage::Storage;

/// Service for credit card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

/// Fields to change on a card; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub closing_day: Option<u32>,
    pub due_day: Option<u32>,
    pub credit_limit: Option<Money>,
    pub notes: Option<String>,
}

/// One card invoice with the purchases billed on it
#[derive(Debug, Clone)]
pub struct Invoice {
    pub card: CreditCard,
    pub month: YearMonth,
    /// First and last purchase dates billed on this invoice
    pub window: (NaiveDate, NaiveDate),
    pub closing_date: NaiveDate,
    pub due_date: NaiveDate,
    pub transactions: Vec<Transaction>,
    pub total: Money,
}

impl<'a> CardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new card
    pub fn create(
        &self,
        name: &str,
        closing_day: u32,
        due_day: u32,
        credit_limit: Option<Money>,
    ) -> CycleResult<CreditCard> {
        let name = name.trim();

        if self.storage.cards.name_exists(name, None)? {
            return Err(CycleError::Duplicate {
                entity_type: "Credit card",
                identifier: name.to_string(),
            });
        }

        let mut card = CreditCard::new(name, closing_day, due_day);
        card.credit_limit = credit_limit;
        card.validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;

        Ok(card)
    }

    pub fn get(&self, id: CardId) -> CycleResult<Option<CreditCard>> {
        self.storage.cards.get(id)
    }

    /// Find a card by name, full ID or short display ID
    pub fn find(&self, identifier: &str) -> CycleResult<Option<CreditCard>> {
        if let Some(card) = self.storage.cards.get_by_name(identifier)? {
            return Ok(Some(card));
        }

        if let Ok(id) = identifier.parse::<CardId>() {
            return self.storage.cards.get(id);
        }

        self.storage.cards.find(|c| c.id.matches_short(identifier))
    }

    pub fn require(&self, identifier: &str) -> CycleResult<CreditCard> {
        self.find(identifier)?
            .ok_or_else(|| CycleError::card_not_found(identifier))
    }

    pub fn list(&self, include_archived: bool) -> CycleResult<Vec<CreditCard>> {
        if include_archived {
            self.storage.cards.get_all()
        } else {
            self.storage.cards.get_active()
        }
    }

    pub fn update(&self, id: CardId, changes: CardUpdate) -> CycleResult<CreditCard> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| CycleError::card_not_found(id.to_string()))?;
        let before = card.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if self.storage.cards.name_exists(name, Some(id))? {
                return Err(CycleError::Duplicate {
                    entity_type: "Credit card",
                    identifier: name.to_string(),
                });
            }
            card.name = name.to_string();
        }
        if let Some(day) = changes.closing_day {
            card.closing_day = day;
        }
        if let Some(day) = changes.due_day {
            card.due_day = day;
        }
        if let Some(limit) = changes.credit_limit {
            card.credit_limit = Some(limit);
        }
        if let Some(notes) = changes.notes {
            card.notes = notes;
        }
        card.updated_at = Utc::now();

        card.validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;

        Ok(card)
    }

    /// Archive a card; it stops being offered as the best card
    pub fn archive(&self, id: CardId) -> CycleResult<CreditCard> {
        let mut card = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| CycleError::card_not_found(id.to_string()))?;

        if card.archived {
            return Err(CycleError::Validation("Card is already archived".into()));
        }

        let before = card.clone();
        card.archive();

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::CreditCard,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;

        Ok(card)
    }

    /// Invoice and due date for a purchase made on `reference`
    pub fn invoice_for(&self, card: &CreditCard, reference: NaiveDate) -> InvoiceAssignment {
        card.assignment(reference)
    }

    /// Active card that leaves the most days until payment
    ///
    /// Cards are compared in creation order; on a tie the older card wins.
    pub fn best_card(
        &self,
        reference: NaiveDate,
    ) -> CycleResult<Option<(CreditCard, InvoiceAssignment)>> {
        let cards = self.storage.cards.get_active()?;

        Ok(cycle::best_card(&cards, reference, CreditCard::cycle)
            .map(|(card, assignment)| (card.clone(), assignment)))
    }

    /// Purchases on `card` billed on the invoice closing in `month`
    pub fn invoice(&self, card: &CreditCard, month: YearMonth) -> CycleResult<Invoice> {
        let card_cycle = card.cycle();
        let transactions: Vec<Transaction> = self
            .storage
            .transactions
            .get_by_source(PaymentSource::Card(card.id))?
            .into_iter()
            .filter(|t| card_cycle.invoice_month_of(t.date) == month)
            .collect();
        let total = transactions.iter().map(|t| t.amount).sum();

        Ok(Invoice {
            card: card.clone(),
            month,
            window: card_cycle.invoice_window(month),
            closing_date: card_cycle.closing_date(month),
            due_date: card_cycle.due_date(month),
            transactions,
            total,
        })
    }

    /// Sum of the purchases billed on one invoice
    pub fn invoice_total(&self, card: &CreditCard, month: YearMonth) -> CycleResult<Money> {
        Ok(self.invoice(card, month)?.total)
    }
}
