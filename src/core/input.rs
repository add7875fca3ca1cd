//! Parsing of raw text fields into calculation input.

use super::calculator::{CalculationInput, DAYS_PER_MONTH};
use super::warnings::Warning;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const MISSING_INPUT_MESSAGE: &str = "Please enter all data";
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid values";

/// Largest absolute amount accepted for a period salary or a deduction (10^24).
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(2_701_131_776, 466_537_709, 54_210, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    MonthlySalary,
    DaysWorked,
    Deductions,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::MonthlySalary => "monthly salary",
            Field::DaysWorked => "days worked",
            Field::Deductions => "deductions",
        };
        f.write_str(name)
    }
}

/// Why raw input could not be turned into a calculation.
///
/// The display text is the message shown to the user; `detail` carries the
/// underlying cause for logs.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{}", MISSING_INPUT_MESSAGE)]
    Missing { field: Field },
    #[error("{}", INVALID_INPUT_MESSAGE)]
    Invalid {
        field: Field,
        value: String,
        reason: String,
    },
}

impl InputError {
    fn invalid(field: Field, value: &str, reason: impl fmt::Display) -> Self {
        InputError::Invalid {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn field(&self) -> Field {
        match self {
            InputError::Missing { field } | InputError::Invalid { field, .. } => *field,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            InputError::Missing { field } => format!("{field} is empty"),
            InputError::Invalid {
                field,
                value,
                reason,
            } => format!("{field} '{value}': {reason}"),
        }
    }
}

/// How to treat zero or negative salaries and day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Accept them, emitting a warning.
    #[default]
    Lenient,
    /// Reject them as invalid input.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub input: CalculationInput,
    pub warnings: Vec<Warning>,
}

/// Turn the two raw fields into a calculation input.
///
/// Emptiness of either field is checked before anything is parsed. Only a
/// truly empty field is missing; blanks go on to fail parsing. The salary may
/// carry surrounding whitespace, the day count may not.
pub fn parse_input(
    salary: &str,
    days: &str,
    validation: Validation,
) -> Result<ParsedInput, InputError> {
    if salary.is_empty() {
        return Err(InputError::Missing {
            field: Field::MonthlySalary,
        });
    }
    if days.is_empty() {
        return Err(InputError::Missing {
            field: Field::DaysWorked,
        });
    }

    let monthly_salary = parse_decimal(Field::MonthlySalary, salary)?;
    let days_worked = days
        .parse::<i32>()
        .map_err(|e| InputError::invalid(Field::DaysWorked, days, e))?;

    let period_salary = (monthly_salary / DAYS_PER_MONTH)
        .checked_mul(Decimal::from(days_worked))
        .filter(|period| period.abs() <= AMOUNT_LIMIT)
        .ok_or_else(|| InputError::invalid(Field::MonthlySalary, salary, "out of range"))?;
    log::trace!("period salary {period_salary} for {monthly_salary} over {days_worked} days");

    let mut warnings = Vec::new();
    if monthly_salary <= Decimal::ZERO {
        if validation == Validation::Strict {
            return Err(InputError::invalid(Field::MonthlySalary, salary, "must be positive"));
        }
        warnings.push(Warning::NonPositiveSalary {
            value: monthly_salary,
        });
    }
    if days_worked <= 0 {
        if validation == Validation::Strict {
            return Err(InputError::invalid(Field::DaysWorked, days, "must be positive"));
        }
        warnings.push(Warning::NonPositiveDays { value: days_worked });
    }

    Ok(ParsedInput {
        input: CalculationInput {
            monthly_salary,
            days_worked,
        },
        warnings,
    })
}

/// Parse an optional deductions field. Empty means no deductions.
pub fn parse_deductions(raw: Option<&str>) -> Result<Decimal, InputError> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(Decimal::ZERO);
    };
    let amount = parse_decimal(Field::Deductions, raw)?;
    if amount < Decimal::ZERO {
        return Err(InputError::invalid(Field::Deductions, raw, "must not be negative"));
    }
    if amount > AMOUNT_LIMIT {
        return Err(InputError::invalid(Field::Deductions, raw, "out of range"));
    }
    Ok(amount)
}

/// Parse a plain or scientific decimal. Digit separators are not numbers.
fn parse_decimal(field: Field, raw: &str) -> Result<Decimal, InputError> {
    let trimmed = raw.trim();
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return Err(InputError::invalid(field, raw, "not a number"));
    }
    let parsed = if trimmed.contains(['e', 'E']) {
        Decimal::from_scientific(trimmed)
    } else {
        Decimal::from_str(trimmed)
    };
    parsed.map_err(|e| InputError::invalid(field, raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(salary: &str, days: &str) -> Result<ParsedInput, InputError> {
        parse_input(salary, days, Validation::Lenient)
    }

    #[test]
    fn parses_plain_values() {
        let parsed = parse("9000", "15").unwrap();
        assert_eq!(parsed.input.monthly_salary, dec!(9000));
        assert_eq!(parsed.input.days_worked, 15);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn parses_fractional_and_scientific_salary() {
        assert_eq!(parse("12345.67", "30").unwrap().input.monthly_salary, dec!(12345.67));
        assert_eq!(parse("1.5e4", "30").unwrap().input.monthly_salary, dec!(15000));
        assert_eq!(parse(" 8000 ", "+10").unwrap().input.days_worked, 10);
    }

    #[test]
    fn digit_separators_are_invalid() {
        let err = parse("1_000", "30").unwrap_err();
        assert!(matches!(
            err,
            InputError::Invalid {
                field: Field::MonthlySalary,
                ..
            }
        ));
        assert_eq!(parse("9,000", "30").unwrap_err().field(), Field::MonthlySalary);
        assert!(parse_deductions(Some("1_000")).is_err());
    }

    #[test]
    fn empty_salary_is_missing() {
        let err = parse("", "15").unwrap_err();
        assert_eq!(
            err,
            InputError::Missing {
                field: Field::MonthlySalary
            }
        );
        assert_eq!(err.to_string(), "Please enter all data");
    }

    #[test]
    fn empty_days_is_missing() {
        assert_eq!(
            parse("9000", "").unwrap_err(),
            InputError::Missing {
                field: Field::DaysWorked
            }
        );
    }

    #[test]
    fn blank_fields_are_invalid_not_missing() {
        let err = parse("   ", "15").unwrap_err();
        assert!(matches!(
            err,
            InputError::Invalid {
                field: Field::MonthlySalary,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Please enter valid values");

        let err = parse("9000", "   ").unwrap_err();
        assert!(matches!(
            err,
            InputError::Invalid {
                field: Field::DaysWorked,
                ..
            }
        ));
    }

    #[test]
    fn days_with_surrounding_spaces_are_invalid() {
        assert_eq!(parse("9000", " 15 ").unwrap_err().field(), Field::DaysWorked);
    }

    #[test]
    fn emptiness_is_checked_before_parsing() {
        // an unparseable salary does not mask the empty days field
        assert!(matches!(parse("abc", ""), Err(InputError::Missing { .. })));
    }

    #[test]
    fn non_numeric_salary_is_invalid() {
        let err = parse("abc", "15").unwrap_err();
        assert!(matches!(
            err,
            InputError::Invalid {
                field: Field::MonthlySalary,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Please enter valid values");
    }

    #[test]
    fn fractional_days_are_invalid() {
        assert_eq!(parse("9000", "15.5").unwrap_err().field(), Field::DaysWorked);
        assert_eq!(parse("9000", "fifteen").unwrap_err().field(), Field::DaysWorked);
    }

    #[test]
    fn overflowing_salary_is_invalid() {
        let err = parse("1e27", "2000000000").unwrap_err();
        assert_eq!(err.field(), Field::MonthlySalary);
        assert!(err.detail().contains("out of range"));
    }

    #[test]
    fn non_positive_values_warn_when_lenient() {
        let parsed = parse("-9000", "0").unwrap();
        assert_eq!(
            parsed.warnings,
            vec![
                Warning::NonPositiveSalary {
                    value: dec!(-9000)
                },
                Warning::NonPositiveDays { value: 0 },
            ]
        );
    }

    #[test]
    fn non_positive_values_rejected_when_strict() {
        let err = parse_input("-9000", "15", Validation::Strict).unwrap_err();
        assert_eq!(err.field(), Field::MonthlySalary);
        let err = parse_input("9000", "-3", Validation::Strict).unwrap_err();
        assert_eq!(err.field(), Field::DaysWorked);
    }

    #[test]
    fn deductions_default_to_zero() {
        assert_eq!(parse_deductions(None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_deductions(Some("")).unwrap(), Decimal::ZERO);
        assert_eq!(parse_deductions(Some("250.50")).unwrap(), dec!(250.50));
    }

    #[test]
    fn negative_deductions_are_invalid() {
        let err = parse_deductions(Some("-10")).unwrap_err();
        assert_eq!(err.field(), Field::Deductions);
    }
}
