use clap::{Args, Subcommand};
use shopkeep_core::{SalesFilter, ValidationError};
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::Output;

mod list;
mod report;

#[derive(Debug, Args)]
pub(crate) struct SalesCommand {
    #[command(subcommand)]
    command: SalesSubcommand,
}

#[derive(Debug, Subcommand)]
enum SalesSubcommand {
    /// List sales, oldest first
    List(PeriodArgs),
    /// Revenue, average sale and units per item
    Report(PeriodArgs),
    /// Reprint one sale
    Show(list::ShowSaleArgs),
}

/// Date filter; an omitted component matches anything.
#[derive(Debug, Default, Args)]
pub(crate) struct PeriodArgs {
    /// Year, e.g. 2024
    #[arg(long)]
    year: Option<String>,

    /// Month, 1-12
    #[arg(long)]
    month: Option<String>,

    /// Day of the month, 1-31
    #[arg(long)]
    day: Option<String>,
}

impl PeriodArgs {
    fn filter(&self) -> Result<SalesFilter, ValidationError> {
        SalesFilter::from_text(
            self.year.as_deref().unwrap_or(""),
            self.month.as_deref().unwrap_or(""),
            self.day.as_deref().unwrap_or(""),
        )
    }
}

pub(crate) async fn run(command: SalesCommand, db: &Database, out: &Output) -> Result<(), CliError> {
    match command.command {
        SalesSubcommand::List(period) => list::run(period, db, out).await,
        SalesSubcommand::Report(period) => report::run(period, db, out).await,
        SalesSubcommand::Show(args) => list::show(args, db, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_missing_components_are_wildcards() {
        let period = PeriodArgs {
            year: Some("2024".to_string()),
            month: Some(" ".to_string()),
            day: None,
        };
        assert_eq!(period.filter().unwrap(), SalesFilter::all().year(2024));
        assert!(PeriodArgs::default().filter().unwrap().is_all());
    }

    #[test]
    fn test_out_of_range_month() {
        let period = PeriodArgs {
            month: Some("13".to_string()),
            ..PeriodArgs::default()
        };
        assert!(period.filter().is_err());
    }
}
