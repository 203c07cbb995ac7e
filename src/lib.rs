//! cardcycle - terminal-based credit card and recurring expense tracker
//!
//! Tracks purchases on credit cards and bank accounts, works out which
//! invoice each card purchase lands on and when that invoice is due, and
//! projects recurring charges (subscriptions, bills, installments) forward
//! in time.
//!
//! # Architecture
//!
//! - `cycle`: calendar arithmetic, invoice assignment and series projection
//! - `models`: core data models (cards, accounts, transactions, series)
//! - `storage`: JSON file storage layer
//! - `services`: business logic layer
//! - `audit`: append-only audit log
//! - `reports`: monthly statement and cash flow
//! - `export`: JSON, YAML and CSV export
//! - `display` / `cli`: terminal formatting and command handlers
//! - `config`: paths and user settings
//!
//! # Example
//!
//! ```rust,ignore
//! use cardcycle::config::{CyclePaths, Settings};
//! use cardcycle::storage::Storage;
//!
//! let paths = CyclePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{CycleError, CycleResult};
