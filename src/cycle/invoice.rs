//! Credit card invoice assignment
//!
//! A card closes its invoice on `closing_day` and the invoice is paid on
//! `due_day`. A purchase made after the closing day accrues to the next
//! month's invoice; a due day on or before the closing day falls in the month
//! after the invoice closes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::YearMonth;

/// Closing/due day configuration of a credit card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardCycle {
    /// Day of month the invoice closes (1-31)
    pub closing_day: u32,
    /// Day of month the invoice is due (1-31)
    pub due_day: u32,
}

/// Which invoice a purchase belongs to and when it must be paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceAssignment {
    /// Month in which the invoice closes
    pub invoice_month: YearMonth,
    /// Payment due date of that invoice
    pub due_date: NaiveDate,
    /// Whole days from the reference date until the due date
    pub days_until_due: i64,
}

impl CardCycle {
    pub fn new(closing_day: u32, due_day: u32) -> Self {
        Self {
            closing_day,
            due_day,
        }
    }

    /// Invoice assignment for a purchase made on `reference`
    pub fn assignment(&self, reference: NaiveDate) -> InvoiceAssignment {
        compute_invoice_assignment(reference, self.closing_day, self.due_day)
    }

    /// Month of the invoice a purchase on `date` accrues to
    pub fn invoice_month_of(&self, date: NaiveDate) -> YearMonth {
        let current = YearMonth::of(date);
        if date.day() > self.closing_day {
            current.next()
        } else {
            current
        }
    }

    /// Whether the due date lands in the month after closing
    pub fn due_in_following_month(&self) -> bool {
        self.due_day <= self.closing_day
    }

    /// Date the invoice of `invoice_month` closes
    pub fn closing_date(&self, invoice_month: YearMonth) -> NaiveDate {
        invoice_month.day(self.closing_day)
    }

    /// Due date of the invoice that closes in `invoice_month`
    pub fn due_date(&self, invoice_month: YearMonth) -> NaiveDate {
        let due_month = if self.due_in_following_month() {
            invoice_month.next()
        } else {
            invoice_month
        };
        due_month.day(self.due_day)
    }

    /// Inclusive purchase window billed on the invoice of `invoice_month`
    pub fn invoice_window(&self, invoice_month: YearMonth) -> (NaiveDate, NaiveDate) {
        let previous_close = self.closing_date(invoice_month.prev());
        (
            previous_close.succ_opt().unwrap_or(previous_close),
            self.closing_date(invoice_month),
        )
    }
}

/// Map a purchase date to its invoice and due date
///
/// Day numbers are not validated here; a day past the end of the target
/// month resolves to that month's last day.
pub fn compute_invoice_assignment(
    reference: NaiveDate,
    closing_day: u32,
    due_day: u32,
) -> InvoiceAssignment {
    let cycle = CardCycle::new(closing_day, due_day);
    let invoice_month = cycle.invoice_month_of(reference);
    let due_date = cycle.due_date(invoice_month);

    InvoiceAssignment {
        invoice_month,
        due_date,
        days_until_due: (due_date - reference).num_days(),
    }
}

/// Pick the card that gives the longest time until payment for a purchase
/// made on `reference`.
///
/// Cards are evaluated in iteration order and the first card reaching the
/// maximum wins a tie.
pub fn best_card<'a, T, I, F>(
    candidates: I,
    reference: NaiveDate,
    cycle_of: F,
) -> Option<(&'a T, InvoiceAssignment)>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> CardCycle,
{
    let mut best: Option<(&'a T, InvoiceAssignment)> = None;

    for candidate in candidates {
        let assignment = cycle_of(candidate).assignment(reference);
        match &best {
            Some((_, current)) if assignment.days_until_due <= current.days_until_due => {}
            _ => best = Some((candidate, assignment)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_same_month_due_date() {
        let a = compute_invoice_assignment(date(2024, 11, 5), 7, 20);
        assert_eq!(a.invoice_month, month(2024, 11));
        assert_eq!(a.due_date, date(2024, 11, 20));
        assert_eq!(a.days_until_due, 15);
    }

    #[test]
    fn test_due_day_before_closing_falls_next_month() {
        let a = compute_invoice_assignment(date(2024, 11, 10), 26, 3);
        assert_eq!(a.invoice_month, month(2024, 11));
        assert_eq!(a.due_date, date(2024, 12, 3));
        assert_eq!(a.days_until_due, 23);
    }

    #[test]
    fn test_purchase_after_closing_rolls_to_next_invoice() {
        let a = compute_invoice_assignment(date(2024, 11, 10), 7, 20);
        assert_eq!(a.invoice_month, month(2024, 12));
        assert_eq!(a.due_date, date(2024, 12, 20));
        assert_eq!(a.days_until_due, 40);
    }

    #[test]
    fn test_year_rollover() {
        let a = compute_invoice_assignment(date(2024, 12, 27), 26, 3);
        assert_eq!(a.invoice_month, month(2025, 1));
        assert_eq!(a.due_date, date(2025, 2, 3));
    }

    #[test]
    fn test_purchase_on_closing_day_stays_in_current_invoice() {
        let a = compute_invoice_assignment(date(2024, 11, 7), 7, 20);
        assert_eq!(a.invoice_month, month(2024, 11));
        assert_eq!(a.due_date, date(2024, 11, 20));
    }

    #[test]
    fn test_equal_closing_and_due_day_is_next_month() {
        let a = compute_invoice_assignment(date(2024, 3, 1), 10, 10);
        assert_eq!(a.due_date, date(2024, 4, 10));
    }

    #[test]
    fn test_due_day_clamped_to_short_month() {
        // closes on the 5th, due on the 31st of the same month
        let a = compute_invoice_assignment(date(2025, 2, 3), 5, 31);
        assert_eq!(a.due_date, date(2025, 2, 28));

        let a = compute_invoice_assignment(date(2024, 2, 3), 5, 31);
        assert_eq!(a.due_date, date(2024, 2, 29));

        let a = compute_invoice_assignment(date(2025, 4, 1), 5, 31);
        assert_eq!(a.due_date, date(2025, 4, 30));
    }

    #[test]
    fn test_closing_day_past_month_end_keeps_purchase_in_month() {
        // closing day 31 never triggers the roll in a 30-day month
        let a = compute_invoice_assignment(date(2025, 4, 30), 31, 10);
        assert_eq!(a.invoice_month, month(2025, 4));
        assert_eq!(a.due_date, date(2025, 5, 10));
    }

    #[test]
    fn test_negative_days_until_due_never_happens_for_future_invoice() {
        for day in 1..=28 {
            let reference = date(2025, 6, day);
            let a = compute_invoice_assignment(reference, 15, 25);
            assert!(a.days_until_due >= 0, "day {} produced {:?}", day, a);
        }
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let reference = date(2024, 12, 27);
        let first = compute_invoice_assignment(reference, 26, 3);
        let second = compute_invoice_assignment(reference, 26, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_due_date_matches_assignment() {
        let cycle = CardCycle::new(26, 3);
        let a = cycle.assignment(date(2024, 12, 27));
        assert_eq!(cycle.due_date(a.invoice_month), a.due_date);
    }

    #[test]
    fn test_invoice_window() {
        let cycle = CardCycle::new(7, 20);
        let (start, end) = cycle.invoice_window(month(2024, 11));
        assert_eq!(start, date(2024, 10, 8));
        assert_eq!(end, date(2024, 11, 7));
    }

    #[test]
    fn test_invoice_window_agrees_with_assignment_for_clamped_closing() {
        let cycle = CardCycle::new(30, 10);
        let mut day = date(2024, 1, 1);
        while day <= date(2024, 12, 31) {
            let invoice = cycle.invoice_month_of(day);
            let (start, end) = cycle.invoice_window(invoice);
            assert!(start <= day && day <= end, "{} not in {}..{}", day, start, end);
            day += Duration::days(1);
        }
    }

    #[test]
    fn test_best_card_picks_longest_grace() {
        let cards = vec![
            ("A", CardCycle::new(7, 20)),
            ("B", CardCycle::new(26, 3)),
        ];
        // On Nov 10: A -> Dec 20 (40 days), B -> Dec 3 (23 days)
        let (best, a) = best_card(&cards, date(2024, 11, 10), |c| c.1).unwrap();
        assert_eq!(best.0, "A");
        assert_eq!(a.due_date, date(2024, 12, 20));
    }

    #[test]
    fn test_best_card_tie_keeps_first() {
        let cards = vec![
            ("first", CardCycle::new(7, 20)),
            ("second", CardCycle::new(7, 20)),
            ("third", CardCycle::new(1, 2)),
        ];
        let reference = date(2024, 11, 10);

        for _ in 0..3 {
            let (best, _) = best_card(&cards, reference, |c| c.1).unwrap();
            assert_eq!(best.0, "first");
        }

        let reversed: Vec<_> = vec![cards[1], cards[0]];
        let (best, _) = best_card(&reversed, reference, |c| c.1).unwrap();
        assert_eq!(best.0, "second");
    }

    #[test]
    fn test_best_card_empty() {
        let cards: Vec<CardCycle> = Vec::new();
        assert!(best_card(&cards, date(2024, 1, 1), |c| *c).is_none());
    }

    #[test]
    fn test_last_representable_month_does_not_overflow() {
        let cycle = CardCycle::new(31, 5);
        let last = YearMonth::of(NaiveDate::MAX);

        let (start, end) = cycle.invoice_window(last);
        assert!(start <= end);
        assert_eq!(end, NaiveDate::MAX);
        assert_eq!(cycle.due_date(last), NaiveDate::MAX);

        let a = compute_invoice_assignment(NaiveDate::MAX, 31, 5);
        assert_eq!(a.invoice_month, last);
    }
}
