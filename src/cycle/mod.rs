//! Date-cycle calculator
//!
//! Pure functions for credit card invoice cycles and recurring series. Nothing
//! in this module reads the system clock or touches storage: every function
//! takes its reference date as a parameter.
//!
//! Day-of-month overflow is resolved the same way everywhere: a day past the
//! end of the target month becomes the month's last day.

pub mod calendar;
pub mod invoice;
pub mod series;

pub use calendar::{add_months, YearMonth};
pub use invoice::{best_card, compute_invoice_assignment, CardCycle, InvoiceAssignment};
pub use series::{
    compute_series_end_date, nth_occurrence, DurationPolicy, RecurrenceInterval, Schedule,
};
