//! Withholding for a salary prorated over the days worked.

use super::tariff::{BracketBreakdown, Tariff};
use super::warnings::Warning;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Salaries are prorated over a fixed 30-day month.
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// Employee IMSS quota, approximated as a flat share of gross pay.
pub const IMSS_RATE: Decimal = dec!(0.00625);

/// Taxable income at or below which the employment subsidy applies.
pub const SUBSIDY_CEILING: Decimal = dec!(11492.66);

/// Fixed employment subsidy credited against ISR.
pub const SUBSIDY_AMOUNT: Decimal = dec!(536.22);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationInput {
    pub monthly_salary: Decimal,
    pub days_worked: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationResult {
    pub daily_salary: Decimal,
    pub period_salary: Decimal,
    pub tax_withheld: Decimal,
    /// Always exactly `period_salary - tax_withheld`
    pub net_salary: Decimal,
    pub breakdown: BracketBreakdown,
}

/// Compute withholding for the days worked out of a monthly salary.
///
/// Nothing is rounded here; amounts keep full decimal precision until they
/// are formatted.
pub fn compute(input: &CalculationInput, tariff: &Tariff) -> CalculationResult {
    let daily_salary = input.monthly_salary / DAYS_PER_MONTH;
    let period_salary = daily_salary * Decimal::from(input.days_worked);
    let breakdown = tariff.evaluate(period_salary);
    let tax_withheld = breakdown.tax;

    CalculationResult {
        daily_salary,
        period_salary,
        tax_withheld,
        net_salary: period_salary - tax_withheld,
        breakdown,
    }
}

/// Optional payroll items applied on top of the bracket calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjustments {
    /// Withhold the employee IMSS quota and exclude it from the taxable base
    pub imss: bool,
    /// Amount deducted from gross pay before tax
    pub deductions: Decimal,
    /// Credit the employment subsidy against the tax
    pub subsidy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payslip {
    pub result: CalculationResult,
    /// Bracket applied to the taxable income
    pub breakdown: BracketBreakdown,
    pub imss_contribution: Decimal,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub subsidy_applied: Decimal,
    /// ISR after the subsidy
    pub tax: Decimal,
    pub net_pay: Decimal,
    pub warnings: Vec<Warning>,
}

impl Payslip {
    /// The three headline figures: gross for the period, ISR, take-home pay.
    pub fn headline(&self) -> (Decimal, Decimal, Decimal) {
        (self.result.period_salary, self.tax, self.net_pay)
    }
}

/// Compute a payslip, applying `adjustments` to the plain calculation.
///
/// With default adjustments the payslip figures are those of [`compute`].
pub fn compute_payslip(
    input: &CalculationInput,
    adjustments: &Adjustments,
    tariff: &Tariff,
) -> Payslip {
    let base = compute(input, tariff);
    let gross = base.period_salary;
    let imss_contribution = if adjustments.imss {
        gross * IMSS_RATE
    } else {
        Decimal::ZERO
    };
    let taxable_income = gross - adjustments.deductions - imss_contribution;

    let mut warnings = Vec::new();
    if gross > Decimal::ZERO && taxable_income <= Decimal::ZERO {
        warnings.push(Warning::NonPositiveTaxableIncome {
            value: taxable_income,
        });
    }

    let breakdown = tariff.evaluate(taxable_income);
    let subsidy_applied = if adjustments.subsidy && taxable_income <= SUBSIDY_CEILING {
        breakdown.tax.min(SUBSIDY_AMOUNT)
    } else {
        Decimal::ZERO
    };
    let tax = breakdown.tax - subsidy_applied;
    log::debug!(
        "taxable {taxable_income}, bracket tax {}, subsidy {subsidy_applied}",
        breakdown.tax
    );

    Payslip {
        result: base,
        breakdown,
        imss_contribution,
        deductions: adjustments.deductions,
        taxable_income,
        subsidy_applied,
        tax,
        net_pay: gross - tax - imss_contribution - adjustments.deductions,
        warnings,
    }
}
