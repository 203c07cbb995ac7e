//! Recurring series service
//!
//! Series are created from a full [`SeriesConfig`] and edited by replacing
//! that config as a whole; the end date is recomputed on both paths. The
//! service also projects upcoming occurrences and posts due occurrences as
//! transactions.

use chrono::{Days, NaiveDate};

use crate::audit::{AuditEntry, EntityType};
use crate::cycle::InvoiceAssignment;
use crate::error::{CycleError, CycleResult};
use crate::models::{Money, RecurringSeries, SeriesConfig, SeriesId, Transaction};
use crate::storage::Storage;

use super::ensure_source_usable;

/// Service for recurring series management
pub struct SeriesService<'a> {
    storage: &'a Storage,
}

/// A projected occurrence of a recurring series
#[derive(Debug, Clone)]
pub struct UpcomingCharge {
    pub series: RecurringSeries,
    pub date: NaiveDate,
    pub amount: Money,
    /// Invoice the charge lands on when the series is billed to a card
    pub invoice: Option<InvoiceAssignment>,
}

impl<'a> SeriesService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a series; its end date is derived from the duration policy
    pub fn create(&self, config: SeriesConfig) -> CycleResult<RecurringSeries> {
        let config = tidy(config);
        config
            .validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;
        ensure_source_usable(self.storage, config.source)?;

        let series = RecurringSeries::new(config);

        self.storage.series.upsert(series.clone())?;
        self.storage.series.save()?;

        self.storage.log_create(
            EntityType::RecurringSeries,
            series.id.to_string(),
            Some(series.config.description.clone()),
            &series,
        )?;

        Ok(series)
    }

    pub fn get(&self, id: SeriesId) -> CycleResult<Option<RecurringSeries>> {
        self.storage.series.get(id)
    }

    /// Find a series by ID, short display ID or description
    pub fn find(&self, identifier: &str) -> CycleResult<Option<RecurringSeries>> {
        if let Ok(id) = identifier.parse::<SeriesId>() {
            return self.storage.series.get(id);
        }

        if let Some(series) = self
            .storage
            .series
            .find(|s| s.id.matches_short(identifier))?
        {
            return Ok(Some(series));
        }

        let wanted = identifier.to_lowercase();
        self.storage
            .series
            .find(|s| s.config.description.to_lowercase() == wanted)
    }

    pub fn require(&self, identifier: &str) -> CycleResult<RecurringSeries> {
        self.find(identifier)?
            .ok_or_else(|| CycleError::series_not_found(identifier))
    }

    /// All series in creation order
    pub fn list(&self) -> CycleResult<Vec<RecurringSeries>> {
        self.storage.series.get_all()
    }

    /// Replace a series' configuration and recompute its end date
    pub fn update(&self, id: SeriesId, config: SeriesConfig) -> CycleResult<RecurringSeries> {
        let mut series = self.load(id)?;
        let before = series.clone();

        let config = tidy(config);
        config
            .validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;
        ensure_source_usable(self.storage, config.source)?;

        series.replace_config(config);
        self.store_update(&before, &series)?;

        Ok(series)
    }

    pub fn pause(&self, id: SeriesId) -> CycleResult<RecurringSeries> {
        let mut series = self.load(id)?;
        if series.paused {
            return Err(CycleError::Validation("Series is already paused".into()));
        }

        let before = series.clone();
        series.pause();
        self.store_update(&before, &series)?;

        Ok(series)
    }

    pub fn resume(&self, id: SeriesId) -> CycleResult<RecurringSeries> {
        let mut series = self.load(id)?;
        if !series.paused {
            return Err(CycleError::Validation("Series is not paused".into()));
        }

        let before = series.clone();
        series.resume();
        self.store_update(&before, &series)?;

        Ok(series)
    }

    /// Delete a series. Transactions already posted from it are kept.
    pub fn delete(&self, id: SeriesId) -> CycleResult<RecurringSeries> {
        let series = self
            .storage
            .series
            .remove(id)?
            .ok_or_else(|| CycleError::series_not_found(id.to_string()))?;
        self.storage.series.save()?;

        self.storage.log_delete(
            EntityType::RecurringSeries,
            series.id.to_string(),
            Some(series.config.description.clone()),
            &series,
        )?;

        Ok(series)
    }

    /// Next occurrence on or after `reference`
    pub fn next_due(&self, series: &RecurringSeries, reference: NaiveDate) -> Option<NaiveDate> {
        series.next_due(reference)
    }

    /// Occurrences of every running series within `days` days of
    /// `reference` (inclusive), ordered by date and then by series age
    pub fn upcoming(&self, reference: NaiveDate, days: u32) -> CycleResult<Vec<UpcomingCharge>> {
        let until = reference
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        let mut charges = Vec::new();
        for series in self.storage.series.get_all()? {
            let card = match series.config.source.card_id() {
                Some(card_id) => self.storage.cards.get(card_id)?,
                None => None,
            };

            for date in series.occurrences_between(reference, until) {
                charges.push(UpcomingCharge {
                    date,
                    amount: series.config.amount,
                    invoice: card.as_ref().map(|c| c.assignment(date)),
                    series: series.clone(),
                });
            }
        }

        // stable: series stay in creation order within a day
        charges.sort_by_key(|c| c.date);
        Ok(charges)
    }

    /// Post every occurrence up to `through` that has no transaction yet
    ///
    /// Occurrences already posted (same series and date) are skipped, so
    /// calling this repeatedly is safe.
    pub fn post_due(&self, through: NaiveDate) -> CycleResult<Vec<Transaction>> {
        let mut posted = Vec::new();

        for series in self.storage.series.get_all()? {
            if series.paused || through < series.config.start_date {
                continue;
            }

            let existing: Vec<NaiveDate> = self
                .storage
                .transactions
                .get_by_series(series.id)?
                .into_iter()
                .map(|t| t.date)
                .collect();

            for date in series.occurrences_between(series.config.start_date, through) {
                if existing.contains(&date) {
                    continue;
                }
                let mut txn = Transaction::with_description(
                    series.config.source,
                    date,
                    series.config.amount,
                    series.config.description.clone(),
                );
                txn.category = series.config.category.clone();
                txn.series_id = Some(series.id);
                posted.push(txn);
            }
        }

        if posted.is_empty() {
            return Ok(posted);
        }

        self.storage.transactions.upsert_many(posted.clone())?;
        self.storage.transactions.save()?;

        let entries: Vec<AuditEntry> = posted
            .iter()
            .map(|txn| {
                AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(txn.display_description()),
                    txn,
                )
            })
            .collect();
        self.storage.log_batch(&entries)?;

        Ok(posted)
    }

    fn load(&self, id: SeriesId) -> CycleResult<RecurringSeries> {
        self.storage
            .series
            .get(id)?
            .ok_or_else(|| CycleError::series_not_found(id.to_string()))
    }

    fn store_update(&self, before: &RecurringSeries, after: &RecurringSeries) -> CycleResult<()> {
        self.storage.series.upsert(after.clone())?;
        self.storage.series.save()?;

        self.storage.log_update(
            EntityType::RecurringSeries,
            after.id.to_string(),
            Some(after.config.description.clone()),
            before,
            after,
        )
    }
}

fn tidy(mut config: SeriesConfig) -> SeriesConfig {
    config.description = config.description.trim().to_string();
    config.category = config
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    config
}
