//! Account service
//!
//! Business logic for bank/cash accounts: creation with unique names,
//! lookup, archiving and balance calculation.

use crate::audit::EntityType;
use crate::error::{CycleError, CycleResult};
use crate::models::{Account, AccountId, AccountType, Money, PaymentSource};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// An account together with its computed balance
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    /// Starting balance plus every transaction paid from the account
    pub balance: Money,
    pub transaction_count: usize,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        starting_balance: Money,
    ) -> CycleResult<Account> {
        let name = name.trim();

        if self.storage.accounts.name_exists(name, None)? {
            return Err(CycleError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let account = Account::with_starting_balance(name, account_type, starting_balance);
        account
            .validate()
            .map_err(|e| CycleError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> CycleResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name, full ID or short display ID
    pub fn find(&self, identifier: &str) -> CycleResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        self.storage
            .accounts
            .find(|a| a.id.matches_short(identifier))
    }

    /// Like [`find`](Self::find), but a missing account is an error
    pub fn require(&self, identifier: &str) -> CycleResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| CycleError::account_not_found(identifier))
    }

    pub fn list(&self, include_archived: bool) -> CycleResult<Vec<Account>> {
        if include_archived {
            self.storage.accounts.get_all()
        } else {
            self.storage.accounts.get_active()
        }
    }

    pub fn list_with_balances(&self, include_archived: bool) -> CycleResult<Vec<AccountSummary>> {
        self.list(include_archived)?
            .into_iter()
            .map(|account| self.get_summary(account))
            .collect()
    }

    /// Attach the computed balance to an account
    pub fn get_summary(&self, account: Account) -> CycleResult<AccountSummary> {
        let transactions = self
            .storage
            .transactions
            .get_by_source(PaymentSource::Account(account.id))?;
        let total: Money = transactions.iter().map(|t| t.amount).sum();

        Ok(AccountSummary {
            balance: account.starting_balance + total,
            transaction_count: transactions.len(),
            account,
        })
    }

    /// Current balance: starting balance plus all account transactions
    pub fn balance(&self, id: AccountId) -> CycleResult<Money> {
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| CycleError::account_not_found(id.to_string()))?;

        Ok(self.get_summary(account)?.balance)
    }

    /// Archive an account (soft delete)
    pub fn archive(&self, id: AccountId) -> CycleResult<Account> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| CycleError::account_not_found(id.to_string()))?;

        if account.archived {
            return Err(CycleError::Validation("Account is already archived".into()));
        }

        let before = account.clone();
        account.archive();

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CyclePaths;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_account() {
        let (_temp, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create("Checking", AccountType::Checking, Money::from_cents(100000))
            .unwrap();

        assert_eq!(account.name, "Checking");
        assert_eq!(account.starting_balance.cents(), 100000);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Checking", AccountType::Checking, Money::zero())
            .unwrap();

        let dup = service.create("checking", AccountType::Savings, Money::zero());
        assert!(matches!(dup, Err(CycleError::Duplicate { .. })));

        let empty = service.create("   ", AccountType::Cash, Money::zero());
        assert!(empty.unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Savings", AccountType::Savings, Money::zero())
            .unwrap();

        assert_eq!(service.find("SAVINGS").unwrap().unwrap().id, account.id);
        assert_eq!(
            service.find(&account.id.to_string()).unwrap().unwrap().id,
            account.id
        );
        assert!(service.require("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_balance_includes_transactions() {
        let (_temp, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Checking", AccountType::Checking, Money::from_cents(50000))
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let source = PaymentSource::Account(account.id);
        storage
            .transactions
            .upsert(Transaction::new(source, date, Money::from_cents(-12000)))
            .unwrap();
        storage
            .transactions
            .upsert(Transaction::new(source, date, Money::from_cents(3000)))
            .unwrap();

        assert_eq!(service.balance(account.id).unwrap().cents(), 41000);

        let summaries = service.list_with_balances(false).unwrap();
        assert_eq!(summaries[0].transaction_count, 2);
    }

    #[test]
    fn test_archive() {
        let (_temp, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Old", AccountType::Other, Money::zero())
            .unwrap();

        service.archive(account.id).unwrap();

        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);
        assert!(service.archive(account.id).unwrap_err().is_validation());
    }
}
