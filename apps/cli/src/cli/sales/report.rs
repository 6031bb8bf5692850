use shopkeep_core::{aggregate, filter_sales};
use shopkeep_db::Database;

use super::PeriodArgs;
use crate::error::CliError;
use crate::output::{render_report, Output};

/// Reads the whole ledger, then filters and aggregates in memory.
pub(crate) async fn run(period: PeriodArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let filter = period.filter()?;
    let sales = db.sales().all_sales().await?;
    let report = aggregate(filter_sales(&sales, &filter))?;

    tracing::debug!(
        sales = report.sale_count,
        revenue = %report.total_revenue,
        "Sales report computed"
    );
    out.emit(&report, |config| render_report(&report, config))
}
