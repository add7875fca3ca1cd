//! Batch command - withholding for every row of a payroll CSV

use crate::cmd::schema::CsvField;
use crate::cmd::{log_warnings, read_input, write_csv, PayrollArgs};
use crate::core::{
    compute_payslip, format_mxn, parse_deductions, parse_input, InputError, Payslip, Tariff,
};
use clap::Args;
use isrc_derive::CsvSchema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Payroll CSV file. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    #[command(flatten)]
    payroll: PayrollArgs,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// One input row of a payroll file
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct PayrollRecord {
    /// Identifier carried through to the output
    #[serde(default)]
    pub employee: Option<String>,
    /// Monthly gross salary in MXN
    pub monthly_salary: String,
    /// Days worked in the period
    pub days_worked: String,
    /// Amount deducted from gross pay before tax
    #[serde(default)]
    pub deductions: Option<String>,
}

/// Outcome of one payroll row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BatchRow {
    #[tabled(rename = "#")]
    pub row: usize,

    #[tabled(rename = "Employee")]
    pub employee: String,

    #[tabled(rename = "Perceived")]
    pub period_salary: String,

    #[tabled(rename = "ISR")]
    pub tax_withheld: String,

    #[tabled(rename = "Net")]
    pub net_salary: String,

    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchTotals {
    pub accepted: usize,
    pub rejected: usize,
    pub period_salary: Decimal,
    pub tax_withheld: Decimal,
    pub net_salary: Decimal,
}

impl BatchTotals {
    /// Add an accepted row's figures. `None` when a total leaves the decimal range.
    fn accept(&mut self, gross: Decimal, tax: Decimal, net: Decimal) -> Option<()> {
        let period_salary = self.period_salary.checked_add(gross)?;
        let tax_withheld = self.tax_withheld.checked_add(tax)?;
        let net_salary = self.net_salary.checked_add(net)?;
        self.period_salary = period_salary;
        self.tax_withheld = tax_withheld;
        self.net_salary = net_salary;
        self.accepted += 1;
        Some(())
    }
}

#[derive(Debug, Serialize)]
struct BatchOutput<'a> {
    rows: &'a [BatchRow],
    totals: TotalsOutput,
}

#[derive(Debug, Serialize)]
struct TotalsOutput {
    accepted: usize,
    rejected: usize,
    period_salary: String,
    tax_withheld: String,
    net_salary: String,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = read_input(&self.file)?;
        let records = read_records(input.as_slice())?;
        log::info!("Read {} payroll records", records.len());

        let tariff = Tariff::withholding_2026();
        let (rows, totals) = process(&records, &self.payroll, &tariff)?;

        if self.json {
            self.print_json(&rows, &totals)
        } else if self.csv {
            write_csv(&rows, io::stdout())
        } else {
            self.print_table(&rows, &totals);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[BatchRow], totals: &BatchTotals) {
        if rows.is_empty() {
            println!("No payroll records found");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
        println!(
            "Accepted: {} | Rejected: {}",
            totals.accepted, totals.rejected
        );
        println!(
            "Perceived: {} | ISR: {} | Net: {}",
            format_mxn(totals.period_salary),
            format_mxn(totals.tax_withheld),
            format_mxn(totals.net_salary)
        );
    }

    fn print_json(&self, rows: &[BatchRow], totals: &BatchTotals) -> anyhow::Result<()> {
        let output = BatchOutput {
            rows,
            totals: TotalsOutput {
                accepted: totals.accepted,
                rejected: totals.rejected,
                period_salary: format!("{:.2}", totals.period_salary.round_dp(2)),
                tax_withheld: format!("{:.2}", totals.tax_withheld.round_dp(2)),
                net_salary: format!("{:.2}", totals.net_salary.round_dp(2)),
            },
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn read_records<R: io::Read>(reader: R) -> anyhow::Result<Vec<PayrollRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let record: PayrollRecord =
            result.map_err(|e| anyhow::anyhow!("payroll row {}: {e}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn calculate(
    record: &PayrollRecord,
    payroll: &PayrollArgs,
    tariff: &Tariff,
) -> Result<Payslip, InputError> {
    let parsed = parse_input(
        &record.monthly_salary,
        &record.days_worked,
        payroll.validation(),
    )?;
    let deductions = parse_deductions(record.deductions.as_deref())?;
    let payslip = compute_payslip(&parsed.input, &payroll.adjustments(deductions), tariff);
    log_warnings(&parsed.warnings);
    log_warnings(&payslip.warnings);
    Ok(payslip)
}

/// Calculate each record independently; rejected rows keep their message.
///
/// Fails only when the running totals no longer fit in a decimal.
pub fn process(
    records: &[PayrollRecord],
    payroll: &PayrollArgs,
    tariff: &Tariff,
) -> anyhow::Result<(Vec<BatchRow>, BatchTotals)> {
    let mut totals = BatchTotals::default();
    let rows = records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let employee = record.employee.clone().unwrap_or_default();
            match calculate(record, payroll, tariff) {
                Ok(payslip) => {
                    let (gross, tax, net) = payslip.headline();
                    totals.accept(gross, tax, net).ok_or_else(|| {
                        anyhow::anyhow!("payroll row {}: batch totals out of range", idx + 1)
                    })?;
                    Ok(BatchRow {
                        row: idx + 1,
                        employee,
                        period_salary: format_mxn(gross),
                        tax_withheld: format_mxn(tax),
                        net_salary: format_mxn(net),
                        status: "ok".to_string(),
                    })
                }
                Err(err) => {
                    log::warn!("row {}: {}", idx + 1, err.detail());
                    totals.rejected += 1;
                    Ok(BatchRow {
                        row: idx + 1,
                        employee,
                        period_salary: String::new(),
                        tax_withheld: String::new(),
                        net_salary: String::new(),
                        status: err.to_string(),
                    })
                }
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((rows, totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        payroll: PayrollArgs,
    }

    fn payroll(args: &[&str]) -> PayrollArgs {
        let argv = std::iter::once("isrc").chain(args.iter().copied());
        Harness::parse_from(argv).payroll
    }

    const PAYROLL: &str = "\
employee,monthly_salary,days_worked,deductions
ana,9000,15,
luis,3000,30,
,abc,15,
maria,,30,
pedro,45000,30,1000
";

    #[test]
    fn reads_records_with_optional_columns() {
        let records = read_records("monthly_salary,days_worked\n9000,15\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee, None);
        assert_eq!(records[0].deductions, None);
        assert_eq!(records[0].monthly_salary, "9000");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        assert!(read_records("employee,days_worked\nana,15\n".as_bytes()).is_err());
    }

    #[test]
    fn rows_are_processed_independently() {
        let records = read_records(PAYROLL.as_bytes()).unwrap();
        let (rows, totals) =
            process(&records, &payroll(&[]), &Tariff::withholding_2026()).unwrap();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].period_salary, "$4,500.00");
        assert_eq!(rows[0].tax_withheld, "$702.86");
        assert_eq!(rows[0].net_salary, "$3,797.14");
        assert_eq!(rows[1].tax_withheld, "$409.25");
        assert_eq!(rows[2].status, "Please enter valid values");
        assert_eq!(rows[3].status, "Please enter all data");
        assert_eq!(rows[3].employee, "maria");
        assert_eq!(rows[4].status, "ok");

        assert_eq!(totals.accepted, 3);
        assert_eq!(totals.rejected, 2);
        assert_eq!(
            totals.net_salary,
            totals.period_salary - totals.tax_withheld - dec!(1000)
        );
    }

    #[test]
    fn strict_mode_rejects_zero_days() {
        let records = read_records("monthly_salary,days_worked\n9000,0\n".as_bytes()).unwrap();

        let (rows, _) = process(&records, &payroll(&[]), &Tariff::withholding_2026()).unwrap();
        assert_eq!(rows[0].status, "ok");

        let (rows, totals) =
            process(&records, &payroll(&["--strict"]), &Tariff::withholding_2026()).unwrap();
        assert_eq!(rows[0].status, "Please enter valid values");
        assert_eq!(totals.rejected, 1);
    }

    #[test]
    fn subsidy_flag_applies_to_every_row() {
        let records = read_records("monthly_salary,days_worked\n3000,30\n".as_bytes()).unwrap();
        let (rows, _) =
            process(&records, &payroll(&["--subsidy"]), &Tariff::withholding_2026()).unwrap();
        assert_eq!(rows[0].tax_withheld, "$0.00");
        assert_eq!(rows[0].net_salary, "$3,000.00");
    }

    #[test]
    fn totals_beyond_decimal_range_are_an_error() {
        // each period salary is just under 10^24; about 82,000 of them overflow
        let record = PayrollRecord {
            employee: None,
            monthly_salary: "29000000000000000000000000".to_string(),
            days_worked: "1".to_string(),
            deductions: None,
        };
        let records = vec![record; 90_000];
        let err = process(&records, &payroll(&[]), &Tariff::withholding_2026()).unwrap_err();
        assert!(err.to_string().contains("batch totals out of range"));
    }

    #[test]
    fn accept_leaves_totals_untouched_on_overflow() {
        let mut totals = BatchTotals {
            period_salary: Decimal::MAX,
            ..Default::default()
        };
        assert_eq!(totals.accept(dec!(1), dec!(0), dec!(1)), None);
        assert_eq!(totals.accepted, 0);
        assert_eq!(totals.net_salary, dec!(0));
        assert_eq!(totals.accept(dec!(0), dec!(0), dec!(0)), Some(()));
        assert_eq!(totals.accepted, 1);
    }
}
