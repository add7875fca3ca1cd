use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod cmd;
mod core;

#[derive(Parser, Debug)]
#[command(name = "isrc", version, about = "Mexican ISR withholding calculator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate withholding for one salary
    Calc(cmd::calc::CalcCommand),
    /// Calculate withholding for every row of a payroll CSV
    Batch(cmd::batch::BatchCommand),
    /// Show the withholding table
    Tariff(cmd::tariff::TariffCommand),
    /// Print the JSON report schema or the batch CSV columns
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Tariff(tariff) => tariff.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
