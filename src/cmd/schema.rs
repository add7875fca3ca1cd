//! Schema command - print the report format and batch input columns

use crate::cmd::batch::PayrollRecord;
use crate::cmd::calc::CalculationReport;
use clap::Args;
use schemars::schema_for;

/// One column of a CSV input, as described by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for `calc --json` output
    JsonSchema,
    /// CSV header row accepted by `batch`
    CsvHeader,
    /// CSV column descriptions for `batch`
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(CalculationReport);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", PayrollRecord::csv_header().join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Batch CSV Input Format");
        println!("======================");
        println!();
        for field in PayrollRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:16} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Amounts are in MXN; days_worked is a whole number of days.");
        Ok(())
    }
}
