//! Non-fatal findings about input and tariffs.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

/// Non-fatal findings raised while checking a tariff or computing a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Adjacent bracket formulas disagree at their shared boundary.
    BracketDiscontinuity {
        #[schemars(with = "f64")]
        boundary: Decimal,
        /// Tax at the boundary using the lower bracket
        #[schemars(with = "f64")]
        below: Decimal,
        /// Tax at the boundary using the upper bracket
        #[schemars(with = "f64")]
        above: Decimal,
    },
    /// A bracket's upper bound does not exceed the previous one.
    BracketOrder {
        bracket: usize,
        #[schemars(with = "f64")]
        boundary: Decimal,
    },
    /// A bracket other than the last has no upper bound.
    UnboundedBracket { bracket: usize },
    /// Monthly salary is zero or negative.
    NonPositiveSalary {
        #[schemars(with = "f64")]
        value: Decimal,
    },
    /// Days worked is zero or negative.
    NonPositiveDays { value: i32 },
    /// Deductions leave nothing to tax.
    NonPositiveTaxableIncome {
        #[schemars(with = "f64")]
        value: Decimal,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::BracketDiscontinuity {
                boundary,
                below,
                above,
            } => write!(
                f,
                "bracket formulas disagree at {boundary}: {below} below, {above} above"
            ),
            Warning::BracketOrder { bracket, boundary } => write!(
                f,
                "bracket {bracket} upper bound does not exceed previous bound {boundary}"
            ),
            Warning::UnboundedBracket { bracket } => {
                write!(f, "bracket {bracket} has no upper bound but is not the last")
            }
            Warning::NonPositiveSalary { value } => {
                write!(f, "monthly salary {value} is not positive")
            }
            Warning::NonPositiveDays { value } => write!(f, "days worked {value} is not positive"),
            Warning::NonPositiveTaxableIncome { value } => {
                write!(f, "taxable income {value} is not positive")
            }
        }
    }
}
