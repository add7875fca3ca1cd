pub mod batch;
pub mod calc;
pub mod schema;
pub mod tariff;

use crate::core::{Adjustments, Validation, Warning};
use clap::Args;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Payroll options shared by the calculating commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct PayrollArgs {
    /// Withhold the employee IMSS quota (0.625% of gross) before tax
    #[arg(long)]
    imss: bool,

    /// Credit the employment subsidy against ISR for low incomes
    #[arg(long)]
    subsidy: bool,

    /// Reject zero or negative salaries and day counts instead of warning
    #[arg(long)]
    strict: bool,
}

impl PayrollArgs {
    pub fn validation(&self) -> Validation {
        if self.strict {
            Validation::Strict
        } else {
            Validation::Lenient
        }
    }

    pub fn adjustments(&self, deductions: Decimal) -> Adjustments {
        Adjustments {
            imss: self.imss,
            deductions,
            subsidy: self.subsidy,
        }
    }
}

/// Read the whole input from a file, or from stdin with "-"
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if path.as_os_str() == "-" {
        BufReader::new(io::stdin().lock()).read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
    } else {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", path.display()))?;
        BufReader::new(file).read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

pub fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        log::warn!("{warning}");
    }
}

/// Serialize records as CSV to `writer`
pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
