//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for accounts, cards, recurring series
//! and transactions. Reports format themselves.

pub mod account;
pub mod card;
pub mod series;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use card::{format_best_card, format_card_details, format_card_list, format_invoice};
pub use series::{format_series_details, format_series_list, format_upcoming};
pub use transaction::{format_transaction_details, format_transaction_register};

/// Shorten `s` to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{}...", head)
}
