pub mod calculator;
pub mod format;
pub mod input;
pub mod tariff;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use calculator::{compute_payslip, Adjustments, CalculationInput, Payslip};
pub use format::{format_amount, format_mxn, format_rate, render_result};
pub use input::{parse_deductions, parse_input, Field, InputError, Validation};
pub use tariff::{BracketBreakdown, Tariff};
pub use warnings::Warning;
