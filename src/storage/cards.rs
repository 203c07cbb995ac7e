//! Credit card repository
//!
//! Cards live in `data/cards.json`.

use chrono::{DateTime, Utc};

use crate::error::CycleError;
use crate::models::{CardId, CreditCard};

use super::collection::{Collection, Record};

pub type CardRepository = Collection<CreditCard>;

impl Record for CreditCard {
    type Id = CardId;

    fn id(&self) -> CardId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Collection<CreditCard> {
    /// Non-archived cards ordered by creation time, then name
    ///
    /// This order decides ties when picking the best card for a purchase.
    pub fn get_active(&self) -> Result<Vec<CreditCard>, CycleError> {
        let mut cards = self.filter(|c| !c.archived)?;
        cards.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(cards)
    }

    /// Look up a card by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<CreditCard>, CycleError> {
        let name_lower = name.to_lowercase();
        self.find(|c| c.name.to_lowercase() == name_lower)
    }

    pub fn name_exists(&self, name: &str, exclude_id: Option<CardId>) -> Result<bool, CycleError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .find(|c| c.name.to_lowercase() == name_lower && Some(c.id) != exclude_id)?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_active_cards_order_by_creation_then_name() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CardRepository::new(temp_dir.path().join("cards.json"));
        let created = Utc::now() - Duration::days(3);

        let mut b = CreditCard::new("Bravo", 5, 15);
        b.created_at = created;
        let mut a = CreditCard::new("Alpha", 5, 15);
        a.created_at = created;
        let mut late = CreditCard::new("Aardvark", 5, 15);
        late.created_at = created + Duration::days(1);
        let mut gone = CreditCard::new("Archived", 5, 15);
        gone.archive();

        for card in [late, gone, b, a] {
            repo.upsert(card).unwrap();
        }

        let names: Vec<_> = repo.get_active().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Aardvark"]);
    }

    #[test]
    fn test_name_exists_excludes_self() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CardRepository::new(temp_dir.path().join("cards.json"));
        let card = CreditCard::new("Visa", 7, 20);
        let id = card.id;
        repo.upsert(card).unwrap();

        assert!(repo.name_exists("visa", None).unwrap());
        assert!(!repo.name_exists("visa", Some(id)).unwrap());
        assert!(repo.get_by_name("VISA").unwrap().is_some());
    }
}
