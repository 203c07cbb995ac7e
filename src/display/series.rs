//! Recurring series display formatting

use chrono::NaiveDate;

use crate::models::RecurringSeries;
use crate::services::UpcomingCharge;

use super::truncate;

/// Format series as a table, each paired with the name of its payment source
pub fn format_series_list(rows: &[(RecurringSeries, String)], reference: NaiveDate) -> String {
    if rows.is_empty() {
        return "No recurring series found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<14}  {:<24}  {:>12}  {:<16}  {:<16}  {:<10}  {}\n",
        "ID", "Description", "Amount", "Cadence", "Source", "Next Due", "Ends",
    ));
    output.push_str(&format!("{:-<112}\n", ""));

    for (series, source) in rows {
        let next = if series.paused {
            "paused".to_string()
        } else {
            series
                .next_due(reference)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "ended".to_string())
        };
        let ends = series
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());

        output.push_str(&format!(
            "{:<14}  {:<24}  {:>12}  {:<16}  {:<16}  {:<10}  {}\n",
            series.id.to_string(),
            truncate(&series.config.description, 24),
            series.config.amount,
            series.cadence(),
            truncate(source, 16),
            next,
            ends,
        ));
    }

    output
}

/// Format one series with its next few occurrences
pub fn format_series_details(
    series: &RecurringSeries,
    source: &str,
    reference: NaiveDate,
    upcoming: &[NaiveDate],
) -> String {
    let config = &series.config;
    let mut output = String::new();

    output.push_str(&format!("Series: {}\n", config.description));
    output.push_str(&format!("  ID:        {}\n", series.id));
    output.push_str(&format!("  Amount:    {}\n", config.amount));
    output.push_str(&format!("  Source:    {}\n", source));
    output.push_str(&format!("  Cadence:   {}\n", series.cadence()));
    output.push_str(&format!("  Starts:    {}\n", config.start_date));
    output.push_str(&format!("  Duration:  {}\n", config.duration.description()));
    output.push_str(&format!(
        "  Ends:      {}\n",
        series
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    ));
    if let Some(category) = &config.category {
        output.push_str(&format!("  Category:  {}\n", category));
    }
    output.push_str(&format!(
        "  Status:    {}\n",
        if series.paused {
            "Paused"
        } else if series.is_finished_at(reference) {
            "Ended"
        } else {
            "Active"
        }
    ));

    if !upcoming.is_empty() {
        output.push_str(&format!("\n  Upcoming from {}:\n", reference));
        for date in upcoming {
            output.push_str(&format!("    {}\n", date));
        }
    }

    output
}

/// Format projected charges, one line per occurrence
pub fn format_upcoming(charges: &[UpcomingCharge]) -> String {
    if charges.is_empty() {
        return "No upcoming charges.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<28}  {:>12}  {}\n",
        "Date", "Description", "Amount", "Invoice"
    ));
    output.push_str(&format!("{:-<76}\n", ""));

    for charge in charges {
        let invoice = charge
            .invoice
            .map(|a| format!("{} (due {})", a.invoice_month, a.due_date))
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<10}  {:<28}  {:>12}  {}\n",
            charge.date.to_string(),
            truncate(&charge.series.config.description, 28),
            charge.amount,
            invoice
        ));
    }

    let total: crate::models::Money = charges.iter().map(|c| c.amount).sum();
    output.push_str(&format!("{:-<76}\n", ""));
    output.push_str(&format!("{:<10}  {:<28}  {:>12}\n", "Total", "", total));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::{DurationPolicy, RecurrenceInterval};
    use crate::models::{CardId, CreditCard, Money, PaymentSource, SeriesConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(duration: DurationPolicy) -> RecurringSeries {
        RecurringSeries::new(SeriesConfig {
            description: "Streaming".into(),
            amount: Money::from_cents(-1599),
            source: PaymentSource::Card(CardId::new()),
            category: None,
            interval: RecurrenceInterval::Week,
            interval_count: 2,
            start_date: date(2024, 1, 1),
            duration,
        })
    }

    #[test]
    fn test_series_list() {
        let mut paused = series(DurationPolicy::Infinite);
        paused.pause();
        let rows = vec![
            (series(DurationPolicy::Infinite), "Visa".to_string()),
            (paused, "Visa".to_string()),
        ];

        let output = format_series_list(&rows, date(2024, 1, 2));
        assert!(output.contains("Every 2 weeks"));
        assert!(output.contains("2024-01-15"));
        assert!(output.contains("paused"));
        assert!(output.contains("never"));
    }

    #[test]
    fn test_series_details_status() {
        let s = series(DurationPolicy::FixedMonths { months: 1 });
        let output = format_series_details(&s, "Visa", date(2024, 3, 1), &[]);

        assert!(output.contains("Ends:      2024-02-01"));
        assert!(output.contains("Status:    Ended"));
        assert!(output.contains("Duration:  For 1 month\n"));
    }

    #[test]
    fn test_format_upcoming() {
        let card = CreditCard::new("Visa", 10, 20);
        let s = series(DurationPolicy::Infinite);
        let charge = UpcomingCharge {
            date: date(2024, 1, 15),
            amount: s.config.amount,
            invoice: Some(card.assignment(date(2024, 1, 15))),
            series: s,
        };

        let output = format_upcoming(&[charge]);
        assert!(output.contains("2024-02 (due 2024-02-20)"));
        assert!(output.contains("-$15.99"));
        assert_eq!(format_upcoming(&[]), "No upcoming charges.");
    }
}
