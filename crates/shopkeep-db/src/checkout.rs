//! # Checkout Engine
//!
//! Moves stock between the catalog and a [`Cart`], and turns a cart into a
//! ledger entry.
//!
//! ## Reservation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart ⇄ Catalog ⇄ Ledger                              │
//! │                                                                         │
//! │  add_to_cart(id, qty)                                                  │
//! │    └── UPDATE items SET quantity = quantity - qty                      │
//! │          WHERE id = ? AND quantity >= qty        (reserve now)         │
//! │                                                                         │
//! │  clear_cart()                                                          │
//! │    └── BEGIN; quantity += reserved, per line; COMMIT                   │
//! │                                                                         │
//! │  checkout(payment)                                                     │
//! │    └── BEGIN                                                           │
//! │        ├── price every line at current catalog price                   │
//! │        ├── payment < total? → ROLLBACK, InsufficientPayment            │
//! │        ├── INSERT sales + sale_lines                                   │
//! │        └── COMMIT → cart CheckedOut, Receipt { change }               │
//! │                                                                         │
//! │  Stock was already taken at reservation; checkout writes no stock.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDateTime};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::item::{fetch_item, reserve_stock, restock};
use crate::repository::sale::insert_sale;
use shopkeep_core::validation::validate_payment_amount;
use shopkeep_core::{
    sale_timestamp, Cart, CartLine, CoreError, Item, Money, NewSale, Receipt,
};

/// Result of a checkout attempt that didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; nothing was written.
    NothingToDo,

    /// The sale was recorded.
    Completed(Receipt),
}

/// Cart and checkout operations against the catalog and ledger.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.checkout();
/// let mut cart = Cart::new();
///
/// engine.add_to_cart(&mut cart, 1, 2).await?;
/// match engine.checkout(&mut cart, Money::from_cents(5000)).await? {
///     CheckoutOutcome::Completed(receipt) => println!("change: {}", receipt.change),
///     CheckoutOutcome::NothingToDo => {}
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Reserves `quantity` units of an item and records them in the cart.
    ///
    /// ## Returns
    /// The item with its stock after the reservation.
    ///
    /// ## Errors
    /// * `InvalidQuantity` - `quantity <= 0`
    /// * `ItemNotFound` - Unknown id
    /// * `InsufficientStock` - Not enough units; nothing reserved
    /// * `CartClosed` - Cart already checked out
    pub async fn add_to_cart(&self, cart: &mut Cart, item_id: i64, quantity: i64) -> DbResult<Item> {
        cart.ensure_open()?;

        debug!(
            session = %cart.session_id(),
            item_id,
            quantity,
            "Reserving stock"
        );

        let mut conn = self.pool.acquire().await?;
        let item = reserve_stock(&mut conn, item_id, quantity).await?;

        cart.record_reservation(&item, quantity)?;

        debug!(
            session = %cart.session_id(),
            item_id,
            remaining = item.quantity,
            "Stock reserved"
        );
        Ok(item)
    }

    /// `Σ current catalog price × reserved quantity` over the cart.
    pub async fn compute_total(&self, cart: &Cart) -> DbResult<Money> {
        let mut conn = self.pool.acquire().await?;
        let mut catalog = Vec::with_capacity(cart.lines().len());

        for line in cart.lines() {
            if let Some(item) = fetch_item(&mut conn, line.item_id).await? {
                catalog.push(item);
            }
        }

        Ok(cart.total(&catalog)?)
    }

    /// Returns every reserved unit to the catalog and empties the cart.
    ///
    /// Lines whose item no longer exists are skipped. The restock runs in
    /// one transaction; on failure the cart keeps its lines.
    pub async fn clear_cart(&self, cart: &mut Cart) -> DbResult<Vec<CartLine>> {
        cart.ensure_open()?;

        let mut tx = self.pool.begin().await?;

        for line in cart.lines() {
            match restock(&mut tx, line.item_id, line.quantity).await {
                Ok(_) => {}
                Err(DbError::Domain(CoreError::ItemNotFound(id))) => {
                    warn!(
                        session = %cart.session_id(),
                        item_id = id,
                        quantity = line.quantity,
                        "Reserved item no longer exists, units not restored"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tx.commit().await?;

        let released = cart.clear()?;
        info!(
            session = %cart.session_id(),
            lines = released.len(),
            "Cart cleared, reservations released"
        );
        Ok(released)
    }

    /// Records the cart as a sale, timestamped now (local time).
    pub async fn checkout(&self, cart: &mut Cart, payment: Money) -> DbResult<CheckoutOutcome> {
        self.checkout_at(cart, payment, Local::now().naive_local())
            .await
    }

    /// Records the cart as a sale with the given timestamp.
    ///
    /// ## Errors
    /// * `InsufficientPayment` - Nothing written, cart unchanged
    /// * `ItemNotFound` - A reserved item was deleted; nothing written
    /// * `CartClosed` - Cart already checked out
    pub async fn checkout_at(
        &self,
        cart: &mut Cart,
        payment: Money,
        at: NaiveDateTime,
    ) -> DbResult<CheckoutOutcome> {
        cart.ensure_open()?;

        if cart.is_empty() {
            debug!(session = %cart.session_id(), "Checkout of empty cart, nothing to do");
            return Ok(CheckoutOutcome::NothingToDo);
        }

        validate_payment_amount(payment).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let mut catalog = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            if let Some(item) = fetch_item(&mut tx, line.item_id).await? {
                catalog.push(item);
            }
        }

        let sale = NewSale::from_lines(sale_timestamp(at), cart.sale_lines(&catalog)?);

        if payment < sale.total {
            debug!(
                session = %cart.session_id(),
                total = %sale.total,
                tendered = %payment,
                "Payment short, checkout rolled back"
            );
            return Err(CoreError::InsufficientPayment {
                total: sale.total,
                tendered: payment,
            }
            .into());
        }

        let recorded = insert_sale(&mut tx, &sale).await?;
        tx.commit().await?;

        cart.mark_checked_out()?;
        let receipt = Receipt::settle(recorded, payment)?;

        info!(
            session = %cart.session_id(),
            sale_id = receipt.sale.id,
            total = %receipt.sale.total,
            change = %receipt.change,
            "Checkout complete"
        );
        Ok(CheckoutOutcome::Completed(receipt))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
