//! Account repository
//!
//! Accounts live in `data/accounts.json`.

use chrono::{DateTime, Utc};

use crate::error::CycleError;
use crate::models::{Account, AccountId};

use super::collection::{Collection, Record};

pub type AccountRepository = Collection<Account>;

impl Record for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Collection<Account> {
    /// All non-archived accounts
    pub fn get_active(&self) -> Result<Vec<Account>, CycleError> {
        self.filter(|a| !a.archived)
    }

    /// Look up an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, CycleError> {
        let name_lower = name.to_lowercase();
        self.find(|a| a.name.to_lowercase() == name_lower)
    }

    /// Check whether another account already uses `name`
    pub fn name_exists(&self, name: &str, exclude_id: Option<AccountId>) -> Result<bool, CycleError> {
        let name_lower = name.to_lowercase();
        Ok(self
            .find(|a| a.name.to_lowercase() == name_lower && Some(a.id) != exclude_id)?
            .is_some())
    }
}
