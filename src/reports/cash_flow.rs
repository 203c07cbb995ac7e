//! Cash flow report
//!
//! Inflow, outflow and net per calendar month over a range of months, by
//! transaction date across all accounts and cards.

use std::collections::BTreeMap;
use std::io::Write;

use crate::cycle::YearMonth;
use crate::error::{CycleError, CycleResult};
use crate::models::Money;
use crate::storage::Storage;

/// Totals for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyFlow {
    pub month: YearMonth,
    pub inflow: Money,
    /// Negative or zero
    pub outflow: Money,
    pub transaction_count: usize,
}

impl MonthlyFlow {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            inflow: Money::zero(),
            outflow: Money::zero(),
            transaction_count: 0,
        }
    }

    pub fn net(&self) -> Money {
        self.inflow + self.outflow
    }
}

/// Month-by-month cash flow
#[derive(Debug, Clone)]
pub struct CashFlowReport {
    pub from: YearMonth,
    pub to: YearMonth,
    /// One entry per month in `[from, to]`, including quiet months
    pub months: Vec<MonthlyFlow>,
}

impl CashFlowReport {
    pub fn generate(storage: &Storage, from: YearMonth, to: YearMonth) -> CycleResult<Self> {
        if from > to {
            return Err(CycleError::Validation(format!(
                "Report start {} is after end {}",
                from, to
            )));
        }

        let mut flows: BTreeMap<YearMonth, MonthlyFlow> = from
            .through(to)
            .map(|m| (m, MonthlyFlow::empty(m)))
            .collect();

        for txn in storage
            .transactions
            .get_by_date_range(from.first_day(), to.last_day())?
        {
            if let Some(flow) = flows.get_mut(&YearMonth::of(txn.date)) {
                if txn.is_outflow() {
                    flow.outflow += txn.amount;
                } else {
                    flow.inflow += txn.amount;
                }
                flow.transaction_count += 1;
            }
        }

        Ok(Self {
            from,
            to,
            months: flows.into_values().collect(),
        })
    }

    pub fn total_inflow(&self) -> Money {
        self.months.iter().map(|m| m.inflow).sum()
    }

    pub fn total_outflow(&self) -> Money {
        self.months.iter().map(|m| m.outflow).sum()
    }

    pub fn net(&self) -> Money {
        self.total_inflow() + self.total_outflow()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Cash Flow: {} to {}\n", self.from, self.to));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14} {:>6}\n",
            "Month", "Inflow", "Outflow", "Net", "Count"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for flow in &self.months {
            output.push_str(&format!(
                "{:<8} {:>14} {:>14} {:>14} {:>6}\n",
                flow.month.to_string(),
                flow.inflow,
                flow.outflow,
                flow.net(),
                flow.transaction_count
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            "Total",
            self.total_inflow(),
            self.total_outflow(),
            self.net()
        ));

        output
    }

    /// Write the monthly rows as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> CycleResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Month", "Inflow", "Outflow", "Net", "Transactions"])
            .map_err(|e| CycleError::Export(e.to_string()))?;

        for flow in &self.months {
            csv_writer
                .write_record([
                    flow.month.to_string(),
                    format_decimal(flow.inflow),
                    format_decimal(flow.outflow),
                    format_decimal(flow.net()),
                    flow.transaction_count.to_string(),
                ])
                .map_err(|e| CycleError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| CycleError::Export(e.to_string()))
    }
}

fn format_decimal(amount: Money) -> String {
    amount.format_with_symbol("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CyclePaths;
    use crate::models::{AccountId, CardId, PaymentSource, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CyclePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn test_cash_flow_by_month() {
        let (_temp, storage) = create_test_storage();
        let account = PaymentSource::Account(AccountId::new());
        let card = PaymentSource::Card(CardId::new());

        for (source, d, cents) in [
            (account, date(2023, 12, 31), 99999),
            (account, date(2024, 1, 1), 200000),
            (card, date(2024, 1, 15), -5000),
            (card, date(2024, 3, 31), -2500),
            (account, date(2024, 4, 1), -1),
        ] {
            storage
                .transactions
                .upsert(Transaction::new(source, d, Money::from_cents(cents)))
                .unwrap();
        }

        let report = CashFlowReport::generate(&storage, ym(2024, 1), ym(2024, 3)).unwrap();

        assert_eq!(report.months.len(), 3);
        assert_eq!(report.months[0].inflow.cents(), 200000);
        assert_eq!(report.months[0].outflow.cents(), -5000);
        assert_eq!(report.months[0].net().cents(), 195000);
        assert_eq!(report.months[1].transaction_count, 0);
        assert_eq!(report.months[2].outflow.cents(), -2500);
        assert_eq!(report.net().cents(), 192500);

        let text = report.format_terminal();
        assert!(text.contains("2024-02"));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let (_temp, storage) = create_test_storage();
        let err = CashFlowReport::generate(&storage, ym(2024, 5), ym(2024, 1)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_export_csv() {
        let (_temp, storage) = create_test_storage();
        storage
            .transactions
            .upsert(Transaction::new(
                PaymentSource::Account(AccountId::new()),
                date(2024, 1, 5),
                Money::from_cents(-1050),
            ))
            .unwrap();

        let report = CashFlowReport::generate(&storage, ym(2024, 1), ym(2024, 1)).unwrap();
        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with("Month,Inflow,Outflow,Net,Transactions\n"));
        assert!(output.contains("2024-01,0.00,-10.50,-10.50,1"));
    }
}
