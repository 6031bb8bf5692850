use clap::Args;
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::{render_items, Output};

#[derive(Debug, Args)]
pub(crate) struct SearchItemsArgs {
    /// Name substring (case-insensitive) or exact id; empty lists everything
    #[arg(default_value = "")]
    query: String,
}

pub(crate) async fn run(db: &Database, out: &Output) -> Result<(), CliError> {
    let items = db.items().list_all().await?;
    out.emit(&items, |config| render_items(&items, config))
}

pub(crate) async fn search(
    args: SearchItemsArgs,
    db: &Database,
    out: &Output,
) -> Result<(), CliError> {
    let items = db.items().search(&args.query).await?;
    out.emit(&items, |config| render_items(&items, config))
}
