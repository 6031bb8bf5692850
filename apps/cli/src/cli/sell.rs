//! `shopkeep sell`: one cart, reserved line by line, then checked out.
//!
//! Stock is reserved as each line is added. If any later step fails
//! (a short line, a bad payment) the reservations made so far are
//! released before the error is reported.

use clap::Args;
use shopkeep_core::validation::{parse_amount, parse_item_id, parse_quantity, validate_payment_amount};
use shopkeep_core::{Cart, Money, ValidationError};
use shopkeep_db::{CheckoutEngine, CheckoutOutcome, Database};

use crate::error::CliError;
use crate::output::{render_receipt, Output};

#[derive(Debug, Args)]
pub(crate) struct SellArgs {
    /// Cart line as ITEM_ID:QUANTITY; repeat for more lines
    #[arg(long = "line", value_name = "ID:QTY", required = true)]
    lines: Vec<String>,

    /// Amount tendered by the customer
    #[arg(long)]
    pay: String,
}

pub(crate) async fn run(args: SellArgs, db: &Database, out: &Output) -> Result<(), CliError> {
    let lines = args
        .lines
        .iter()
        .map(|line| parse_line(line))
        .collect::<Result<Vec<_>, _>>()?;
    let payment = parse_amount("payment", &args.pay)?;
    validate_payment_amount(payment)?;

    let engine = db.checkout();
    let mut cart = Cart::new();

    let outcome = match sell(&engine, &mut cart, &lines, payment).await {
        Ok(outcome) => outcome,
        Err(err) => {
            release(&engine, &mut cart).await;
            return Err(err);
        }
    };

    match outcome {
        CheckoutOutcome::Completed(receipt) => {
            out.emit(&receipt, |config| render_receipt(&receipt, config))
        }
        CheckoutOutcome::NothingToDo => out.emit(
            &serde_json::json!({ "outcome": "nothing_to_do" }),
            |_| "Cart is empty; nothing to do.".to_string(),
        ),
    }
}

async fn sell(
    engine: &CheckoutEngine,
    cart: &mut Cart,
    lines: &[(i64, i64)],
    payment: Money,
) -> Result<CheckoutOutcome, CliError> {
    for &(item_id, quantity) in lines {
        engine.add_to_cart(cart, item_id, quantity).await?;
    }

    tracing::debug!(
        session = %cart.session_id(),
        units = cart.total_units(),
        %payment,
        "Checking out"
    );

    let outcome = engine.checkout(cart, payment).await?;
    if let CheckoutOutcome::Completed(receipt) = &outcome {
        tracing::debug!(sale = receipt.sale.id, total = %receipt.sale.total, "Sale recorded");
    }
    Ok(outcome)
}

async fn release(engine: &CheckoutEngine, cart: &mut Cart) {
    if cart.is_empty() {
        return;
    }

    if let Err(err) = engine.clear_cart(cart).await {
        tracing::error!(
            session = %cart.session_id(),
            error = %err,
            "Could not release reserved stock"
        );
    }
}

/// Parses `ID:QTY`.
fn parse_line(text: &str) -> Result<(i64, i64), ValidationError> {
    let (id, quantity) = text.split_once(':').ok_or_else(|| ValidationError::InvalidFormat {
        field: "line".to_string(),
        reason: format!("'{text}' is not ID:QTY"),
    })?;

    Ok((parse_item_id(id)?, parse_quantity("quantity", quantity)?))
}
