//! Reports for cardcycle
//!
//! - `MonthlyStatement`: a month's activity per account and per card invoice
//! - `CashFlowReport`: inflow, outflow and net per month

pub mod cash_flow;
pub mod statement;

pub use cash_flow::{CashFlowReport, MonthlyFlow};
pub use statement::{MonthlyStatement, StatementSection};
