use clap::Args;
use shopkeep_core::validation::parse_quantity;
use shopkeep_core::ValidationError;
use shopkeep_db::{Database, DbError};

use super::PeriodArgs;
use crate::error::CliError;
use crate::output::{render_sale, render_sales, Output};

#[derive(Debug, Args)]
pub(crate) struct ShowSaleArgs {
    /// Sale id
    id: String,
}

/// Filtering happens in SQL here.
pub(crate) async fn run(period: PeriodArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let filter = period.filter()?;
    let sales = db.sales().sales_in_period(&filter).await?;

    out.emit(&sales, |config| render_sales(&sales, config))
}

pub(crate) async fn show(args: ShowSaleArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let id = parse_quantity("sale id", &args.id)?;
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "sale id".to_string(),
        }
        .into());
    }

    let sale = db
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))?;

    out.emit(&sale, |config| render_sale(&sale, config))
}
