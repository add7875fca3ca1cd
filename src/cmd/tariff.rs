//! Tariff command - show the bracket table and check its consistency

use crate::core::{format_amount, format_rate, Tariff, Warning};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TariffCommand {
    /// Report formula mismatches at bracket boundaries, exiting 1 if any
    #[arg(long)]
    check: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled, Serialize)]
struct BracketRow {
    #[tabled(rename = "#")]
    bracket: usize,

    #[tabled(rename = "Lower Limit")]
    lower_limit: String,

    #[tabled(rename = "Upper Limit")]
    upper_limit: String,

    #[tabled(rename = "Fixed Fee")]
    fixed_fee: String,

    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Serialize)]
struct TariffOutput<'a> {
    name: &'static str,
    brackets: &'a [BracketRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a [Warning]>,
}

impl TariffCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tariff = Tariff::withholding_2026();
        let rows = bracket_rows(&tariff);
        let issues = if self.check {
            tariff.check()
        } else {
            Vec::new()
        };

        if self.json {
            let output = TariffOutput {
                name: tariff.name(),
                brackets: &rows,
                issues: self.check.then_some(issues.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_table(&tariff, &rows, &issues);
        }

        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_table(&self, tariff: &Tariff, rows: &[BracketRow], issues: &[Warning]) {
        println!();
        println!("{}", tariff.name().to_uppercase());
        println!();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        if !self.check {
            return;
        }
        println!();
        if issues.is_empty() {
            println!("No issues found");
        } else {
            println!("{} issue(s) found:", issues.len());
            for issue in issues {
                println!("  {}", issue);
            }
        }
    }
}

fn bracket_rows(tariff: &Tariff) -> Vec<BracketRow> {
    tariff
        .brackets()
        .iter()
        .enumerate()
        .map(|(idx, b)| BracketRow {
            bracket: idx + 1,
            lower_limit: format_amount(b.floor),
            upper_limit: b.upper.map_or("and above".to_string(), format_amount),
            fixed_fee: format_amount(b.fixed_fee),
            rate: format_rate(b.rate),
        })
        .collect()
}
