//! Account display formatting

use crate::models::Money;
use crate::services::AccountSummary;

/// Format accounts with balances as a table
pub fn format_account_list(summaries: &[AccountSummary]) -> String {
    if summaries.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| s.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:>14}  {:>6}  {}\n",
        "Name", "Type", "Balance", "Txns", "Status",
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:->14}  {:->6}  {:-<8}\n",
        "", "", "", "", "",
    ));

    for summary in summaries {
        output.push_str(&format!(
            "{:<name_width$}  {:<10}  {:>14}  {:>6}  {}\n",
            summary.account.name,
            summary.account.account_type.to_string(),
            summary.balance.to_string(),
            summary.transaction_count,
            if summary.account.archived { "Archived" } else { "" },
        ));
    }

    let total: Money = summaries.iter().map(|s| s.balance).sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:-<10}  {:->14}\n",
        "", "", "",
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<10}  {:>14}\n",
        "TOTAL",
        "",
        total.to_string(),
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary) -> String {
    let account = &summary.account;
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  Type:             {}\n", account.account_type));
    output.push_str(&format!("  ID:               {}\n", account.id));
    output.push_str(&format!(
        "  Archived:         {}\n",
        if account.archived { "Yes" } else { "No" }
    ));
    output.push('\n');
    output.push_str(&format!("  Starting Balance: {}\n", account.starting_balance));
    output.push_str(&format!("  Current Balance:  {}\n", summary.balance));
    output.push_str(&format!("  Transactions:     {}\n", summary.transaction_count));

    if !account.notes.is_empty() {
        output.push_str(&format!("\n  Notes: {}\n", account.notes));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};

    fn summary(name: &str, balance: i64) -> AccountSummary {
        AccountSummary {
            account: Account::new(name, AccountType::Checking),
            balance: Money::from_cents(balance),
            transaction_count: 2,
        }
    }

    #[test]
    fn test_format_account_list() {
        let output = format_account_list(&[summary("Checking", 100000), summary("Wallet", 2550)]);

        assert!(output.contains("Checking"));
        assert!(output.contains("$1000.00"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("$1025.50"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_account_list(&[]), "No accounts found.");
    }

    #[test]
    fn test_account_details() {
        let output = format_account_details(&summary("Checking", -500));
        assert!(output.contains("Account: Checking"));
        assert!(output.contains("Current Balance:  -$5.00"));
    }
}
