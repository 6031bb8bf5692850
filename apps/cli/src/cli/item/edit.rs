use clap::Args;
use shopkeep_core::validation::{parse_item_id, parse_price, parse_quantity};
use shopkeep_core::{ItemEdit, ItemField, ItemUpdate};
use shopkeep_db::Database;

use crate::error::CliError;
use crate::output::{render_item, Output};

#[derive(Debug, Args)]
pub(crate) struct EditItemArgs {
    /// Item id
    id: String,

    /// New name
    #[arg(long)]
    name: String,

    /// New unit price
    #[arg(long)]
    price: String,

    /// New stock level (0 allowed)
    #[arg(long)]
    quantity: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetFieldArgs {
    /// Item id
    id: String,

    /// Field to change: name, price or quantity
    field: ItemField,

    /// New value, as text
    value: String,
}

pub(crate) async fn run(args: EditItemArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let id = parse_item_id(&args.id)?;
    let edit = ItemEdit::new(
        &args.name,
        parse_price(&args.price)?,
        parse_quantity("quantity", &args.quantity)?,
    )?;

    let item = db.items().edit(id, &edit).await?;
    out.emit(&item, |config| format!("Updated {}", render_item(&item, config)))
}

/// A rejected update leaves the item as it was; nothing is re-read here.
pub(crate) async fn set(args: SetFieldArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let id = parse_item_id(&args.id)?;
    let update = ItemUpdate::from_text(args.field, &args.value)?;

    let item = db.items().update(id, update).await?;
    out.emit(&item, |config| {
        format!("Updated {} of {}", args.field, render_item(&item, config))
    })
}
