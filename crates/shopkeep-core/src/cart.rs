//! # Cart
//!
//! Bookkeeping for one in-progress sale.
//!
//! The cart never touches storage. It only records what the checkout engine
//! has already reserved in the catalog: by the time a line lands here, its
//! quantity was subtracted from the item's stock.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart States                                     │
//! │                                                                         │
//! │             record_reservation()                                        │
//! │   ┌───────┐ ───────────────────► ┌──────────┐  mark_checked_out()      │
//! │   │ Empty │                      │ Building │ ─────────────────┐       │
//! │   └───────┘ ◄─────────────────── └──────────┘                  ▼       │
//! │                  clear()              │ ▲            ┌────────────┐    │
//! │                                       └─┘            │ CheckedOut │    │
//! │                            record_reservation()      │ (terminal) │    │
//! │                                                      └────────────┘    │
//! │                                                                         │
//! │  Any mutation of a CheckedOut cart fails with CoreError::CartClosed.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Item, Renumbering, SaleLine};

/// Where a cart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    Empty,
    Building,
    CheckedOut,
}

/// One reserved line of the cart.
///
/// `item_name` is a snapshot for display; the recorded sale uses the
/// catalog name and price current at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
}

/// An in-progress sale.
///
/// ## Invariants
/// - Lines are unique by `item_id`; reserving the same item again merges
/// - Lines keep first-insertion order
/// - Every quantity is > 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    session_id: Uuid,
    status: CartStatus,
    lines: Vec<CartLine>,
}

impl Cart {
    /// Starts a new empty session.
    pub fn new() -> Self {
        Cart {
            session_id: Uuid::new_v4(),
            status: CartStatus::Empty,
            lines: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn status(&self) -> CartStatus {
        self.status
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fails with [`CoreError::CartClosed`] once the cart is checked out.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.status == CartStatus::CheckedOut {
            return Err(CoreError::CartClosed);
        }
        Ok(())
    }

    /// Quantity currently reserved for `item_id` (0 if none).
    pub fn reserved_for(&self, item_id: i64) -> i64 {
        self.lines
            .iter()
            .find(|l| l.item_id == item_id)
            .map_or(0, |l| l.quantity)
    }

    /// Total units across all lines.
    pub fn total_units(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Records a reservation the store has already applied.
    ///
    /// Merges into an existing line for the same item.
    pub fn record_reservation(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;

        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        match self.lines.iter_mut().find(|l| l.item_id == item.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CoreError::InvalidQuantity {
                        requested: quantity,
                    })?;
                line.item_name = item.name.clone();
            }
            None => self.lines.push(CartLine {
                item_id: item.id,
                item_name: item.name.clone(),
                quantity,
            }),
        }

        self.status = CartStatus::Building;
        Ok(())
    }

    /// Empties the cart and hands back the lines so their reservations can
    /// be released.
    pub fn clear(&mut self) -> CoreResult<Vec<CartLine>> {
        self.ensure_open()?;
        self.status = CartStatus::Empty;
        Ok(std::mem::take(&mut self.lines))
    }

    /// Final transition after the sale is recorded.
    pub fn mark_checked_out(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.status = CartStatus::CheckedOut;
        Ok(())
    }

    /// Follows catalog id moves after a delete.
    ///
    /// Returns the line whose item was deleted, if the cart held one. Its
    /// reserved units went away with the item.
    pub fn apply_renumbering(&mut self, renumbering: &Renumbering) -> Option<CartLine> {
        let mut dropped = None;

        self.lines.retain_mut(|line| match renumbering.resolve(line.item_id) {
            Some(new_id) => {
                line.item_id = new_id;
                true
            }
            None => {
                dropped = Some(line.clone());
                false
            }
        });

        if self.lines.is_empty() && self.status == CartStatus::Building {
            self.status = CartStatus::Empty;
        }

        dropped
    }

    /// Prices every line against the current catalog records.
    ///
    /// `catalog` must contain each item the cart references; a missing one
    /// fails with [`CoreError::ItemNotFound`].
    pub fn sale_lines(&self, catalog: &[Item]) -> CoreResult<Vec<SaleLine>> {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let item = catalog
                    .iter()
                    .find(|i| i.id == line.item_id)
                    .ok_or(CoreError::ItemNotFound(line.item_id))?;

                Ok(SaleLine {
                    item_id: Some(item.id),
                    item_name: item.name.clone(),
                    quantity: line.quantity,
                    unit_price: item.price,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        checked_total(&lines)?;
        Ok(lines)
    }

    /// `Σ current price × reserved quantity`.
    pub fn total(&self, catalog: &[Item]) -> CoreResult<Money> {
        checked_total(&self.sale_lines(catalog)?)
    }
}

/// Sum of line totals, refusing amounts that don't fit in `i64` cents.
fn checked_total(lines: &[SaleLine]) -> CoreResult<Money> {
    lines
        .iter()
        .map(|l| l.unit_price.checked_multiply_quantity(l.quantity))
        .try_fold(Money::zero(), |acc, line| acc.checked_add(line?))
        .ok_or_else(|| {
            ValidationError::TooLarge {
                field: "sale total".to_string(),
                max: Money::from_cents(i64::MAX).to_string(),
            }
            .into()
        })
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
