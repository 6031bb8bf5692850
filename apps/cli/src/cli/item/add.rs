use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use shopkeep_core::ItemDraft;
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::{render_item, render_items, Output};

#[derive(Debug, Args)]
pub(crate) struct AddItemArgs {
    /// Item name, unique across the catalog
    #[arg(long)]
    name: String,

    /// Unit price, e.g. 10 or 10.50
    #[arg(long)]
    price: String,

    /// Units in stock (at least 1)
    #[arg(long)]
    quantity: String,
}

#[derive(Debug, Args)]
pub(crate) struct ImportItemsArgs {
    /// JSON array of {"name", "price", "quantity"} text rows; "-" reads stdin
    file: PathBuf,
}

pub(crate) async fn run(args: AddItemArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let new_item = ItemDraft::new(args.name, args.price, args.quantity).parse()?;
    let item = db.items().add(&new_item).await?;

    out.emit(&item, |config| format!("Added {}", render_item(&item, config)))
}

pub(crate) async fn import(
    args: ImportItemsArgs,
    db: &Database,
    out: &Output,
) -> Result<(), CliError> {
    let text = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.file)?
    };

    let drafts: Vec<ItemDraft> = serde_json::from_str(&text)?;
    let added = db.items().add_batch(&drafts).await?;

    out.emit(&added, |config| {
        format!("Imported {} items\n{}", added.len(), render_items(&added, config))
    })
}
