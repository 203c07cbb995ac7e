//! Recurring series repository
//!
//! Series live in `data/series.json`.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CycleError;
use crate::models::{CardId, RecurringSeries, SeriesId};

use super::collection::{Collection, Record};

pub type SeriesRepository = Collection<RecurringSeries>;

impl Record for RecurringSeries {
    type Id = SeriesId;

    fn id(&self) -> SeriesId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Collection<RecurringSeries> {
    /// Series that are not paused and have not run past their end date
    pub fn get_active(&self, reference: NaiveDate) -> Result<Vec<RecurringSeries>, CycleError> {
        self.filter(|s| !s.paused && !s.is_finished_at(reference))
    }

    /// Series charged to a given card
    pub fn get_by_card(&self, card_id: CardId) -> Result<Vec<RecurringSeries>, CycleError> {
        self.filter(|s| s.config.source.card_id() == Some(card_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::{DurationPolicy, RecurrenceInterval};
    use crate::models::{Money, PaymentSource, SeriesConfig};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(card: CardId, duration: DurationPolicy) -> SeriesConfig {
        SeriesConfig {
            description: "Gym".into(),
            amount: Money::from_cents(-4000),
            source: PaymentSource::Card(card),
            category: None,
            interval: RecurrenceInterval::Month,
            interval_count: 1,
            start_date: date(2024, 1, 10),
            duration,
        }
    }

    #[test]
    fn test_active_excludes_paused_and_finished() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SeriesRepository::new(temp_dir.path().join("series.json"));
        let card = CardId::new();

        let running = RecurringSeries::new(config(card, DurationPolicy::Infinite));
        let finished = RecurringSeries::new(config(card, DurationPolicy::FixedMonths { months: 2 }));
        let mut paused = RecurringSeries::new(config(card, DurationPolicy::Infinite));
        paused.pause();
        let running_id = running.id;

        repo.upsert_many(vec![running, finished, paused]).unwrap();

        let active = repo.get_active(date(2024, 6, 1)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, running_id);
        assert_eq!(repo.get_by_card(card).unwrap().len(), 3);
        assert!(repo.get_by_card(CardId::new()).unwrap().is_empty());
    }
}
