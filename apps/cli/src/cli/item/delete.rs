use clap::Args;
use shopkeep_core::validation::parse_item_id;
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::{render_renumbering, Output};

#[derive(Debug, Args)]
pub(crate) struct DeleteItemArgs {
    /// Item id
    id: String,
}

pub(crate) async fn run(args: DeleteItemArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let id = parse_item_id(&args.id)?;
    let renumbering = db.items().delete(id).await?;

    out.emit(&renumbering, |_| render_renumbering(&renumbering))
}
