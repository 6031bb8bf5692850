use clap::{Args, Subcommand};
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::Output;

mod add;
mod delete;
mod edit;
mod list;

#[derive(Debug, Args)]
pub(crate) struct ItemCommand {
    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Debug, Subcommand)]
enum ItemSubcommand {
    /// Add one item
    Add(add::AddItemArgs),
    /// Add every item of a JSON file, or none of them
    Import(add::ImportItemsArgs),
    /// Replace an item's name, price and quantity together
    Edit(edit::EditItemArgs),
    /// Change a single field of an item
    Set(edit::SetFieldArgs),
    /// Delete an item
    Delete(delete::DeleteItemArgs),
    /// List the whole catalog
    List,
    /// Find items by name or id
    Search(list::SearchItemsArgs),
}

pub(crate) async fn run(command: ItemCommand, db: &Database, out: &Output) -> Result<(), CliError> {
    match command.command {
        ItemSubcommand::Add(args) => add::run(args, db, out).await,
        ItemSubcommand::Import(args) => add::import(args, db, out).await,
        ItemSubcommand::Edit(args) => edit::run(args, db, out).await,
        ItemSubcommand::Set(args) => edit::set(args, db, out).await,
        ItemSubcommand::Delete(args) => delete::run(args, db, out).await,
        ItemSubcommand::List => list::run(db, out).await,
        ItemSubcommand::Search(args) => list::search(args, db, out).await,
    }
}
