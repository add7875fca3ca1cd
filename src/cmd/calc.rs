//! Calc command - withholding for a single salary

use crate::cmd::{log_warnings, PayrollArgs};
use crate::core::{
    compute_payslip, format_mxn, format_rate, parse_deductions, parse_input, render_result,
    Adjustments, BracketBreakdown, CalculationInput, Field, InputError, Payslip, Tariff, Warning,
};
use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Monthly gross salary in MXN
    #[arg(short, long)]
    salary: Option<String>,

    /// Days worked in the period
    #[arg(short, long)]
    days: Option<String>,

    /// Amount deducted from gross pay before tax
    #[arg(long)]
    deductions: Option<String>,

    #[command(flatten)]
    payroll: PayrollArgs,

    /// Show how the bracket produced the tax
    #[arg(long)]
    detail: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Result of a single calculation, as printed with `--json`
#[derive(Debug, Serialize, JsonSchema)]
pub struct CalculationReport {
    pub tariff: String,
    pub monthly_salary: String,
    pub days_worked: i32,
    pub daily_salary: String,
    /// Gross salary for the days worked
    pub period_salary: String,
    /// ISR withheld, after the subsidy when requested
    pub tax_withheld: String,
    /// Take-home pay after ISR and any adjustments
    pub net_salary: String,
    pub bracket: BracketSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<AdjustmentSummary>,
    pub warnings: Vec<Warning>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BracketSummary {
    pub lower_limit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_limit: Option<String>,
    pub excess: String,
    pub rate_pct: String,
    pub marginal: String,
    pub fixed_fee: String,
    pub tax: String,
}

impl From<&BracketBreakdown> for BracketSummary {
    fn from(b: &BracketBreakdown) -> Self {
        BracketSummary {
            lower_limit: format!("{:.2}", b.lower_limit),
            upper_limit: b.upper_limit.map(|u| format!("{:.2}", u)),
            excess: format!("{:.2}", b.excess.round_dp(2)),
            rate_pct: format!("{:.2}", b.rate * Decimal::ONE_HUNDRED),
            marginal: format!("{:.2}", b.marginal.round_dp(2)),
            fixed_fee: format!("{:.2}", b.fixed_fee),
            tax: format!("{:.2}", b.tax.round_dp(2)),
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct AdjustmentSummary {
    pub imss_contribution: String,
    pub deductions: String,
    pub taxable_income: String,
    pub subsidy_applied: String,
}

/// Rejected input, as printed with `--json`
#[derive(Debug, Serialize)]
struct InputFailure {
    error: String,
    field: Field,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tariff = Tariff::withholding_2026();
        match self.calculate(&tariff) {
            Ok((input, payslip)) => {
                log_warnings(&payslip.warnings);
                if self.json {
                    let report = build_report(&input, &payslip, &tariff, &self.payroll);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(())
                } else {
                    self.print_text(&input, &payslip);
                    Ok(())
                }
            }
            Err(err) => {
                log::info!("input rejected: {}", err.detail());
                if self.json {
                    let failure = InputFailure {
                        error: err.to_string(),
                        field: err.field(),
                    };
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                } else {
                    println!("{err}");
                }
                std::process::exit(1);
            }
        }
    }

    fn calculate(&self, tariff: &Tariff) -> Result<(CalculationInput, Payslip), InputError> {
        let parsed = parse_input(
            self.salary.as_deref().unwrap_or_default(),
            self.days.as_deref().unwrap_or_default(),
            self.payroll.validation(),
        )?;
        let deductions = parse_deductions(self.deductions.as_deref())?;
        let adjustments = self.payroll.adjustments(deductions);

        let mut payslip = compute_payslip(&parsed.input, &adjustments, tariff);
        let mut warnings = parsed.warnings;
        warnings.append(&mut payslip.warnings);
        payslip.warnings = warnings;
        Ok((parsed.input, payslip))
    }

    fn print_text(&self, input: &CalculationInput, payslip: &Payslip) {
        println!("{}", render_result(payslip));
        if !self.detail {
            return;
        }

        let b = &payslip.breakdown;
        println!();
        match b.upper_limit {
            Some(upper) => println!(
                "Bracket: {} to {} at {}",
                format_mxn(b.lower_limit),
                format_mxn(upper),
                format_rate(b.rate)
            ),
            None => println!(
                "Bracket: above {} at {}",
                format_mxn(b.lower_limit),
                format_rate(b.rate)
            ),
        }
        println!("  Excess over lower limit: {}", format_mxn(b.excess));
        println!("  Marginal tax: {}", format_mxn(b.marginal));
        println!("  Fixed fee: {}", format_mxn(b.fixed_fee));
        println!(
            "Daily salary: {} over {} days",
            format_mxn(payslip.result.daily_salary),
            input.days_worked
        );

        if requested_adjustments(&self.payroll, payslip) {
            println!();
            println!("IMSS contribution: {}", format_mxn(payslip.imss_contribution));
            println!("Deductions: {}", format_mxn(payslip.deductions));
            println!("Taxable income: {}", format_mxn(payslip.taxable_income));
            println!("Subsidy applied: {}", format_mxn(payslip.subsidy_applied));
        }
    }
}

/// Whether any payroll adjustment was asked for, even one that came to zero.
fn requested_adjustments(payroll: &PayrollArgs, payslip: &Payslip) -> bool {
    payroll.adjustments(payslip.deductions) != Adjustments::default()
}

fn build_report(
    input: &CalculationInput,
    payslip: &Payslip,
    tariff: &Tariff,
    payroll: &PayrollArgs,
) -> CalculationReport {
    let (gross, tax, net) = payslip.headline();
    CalculationReport {
        tariff: tariff.name().to_string(),
        monthly_salary: format!("{:.2}", input.monthly_salary.round_dp(2)),
        days_worked: input.days_worked,
        daily_salary: format!("{:.2}", payslip.result.daily_salary.round_dp(2)),
        period_salary: format!("{:.2}", gross.round_dp(2)),
        tax_withheld: format!("{:.2}", tax.round_dp(2)),
        net_salary: format!("{:.2}", net.round_dp(2)),
        bracket: BracketSummary::from(&payslip.breakdown),
        adjustments: requested_adjustments(payroll, payslip).then(|| AdjustmentSummary {
            imss_contribution: format!("{:.2}", payslip.imss_contribution.round_dp(2)),
            deductions: format!("{:.2}", payslip.deductions.round_dp(2)),
            taxable_income: format!("{:.2}", payslip.taxable_income.round_dp(2)),
            subsidy_applied: format!("{:.2}", payslip.subsidy_applied.round_dp(2)),
        }),
        warnings: payslip.warnings.clone(),
        generated_at: Utc::now(),
    }
}
