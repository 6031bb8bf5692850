//! # Domain Types
//!
//! Core domain types used throughout Shopkeep.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  item_id?       │       │
//! │  │  name (unique)  │   │  timestamp      │   │  item_name      │       │
//! │  │  price          │   │  summary        │   │  quantity       │       │
//! │  │  quantity       │   │  total, lines   │   │  unit_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Inputs:  NewItem, ItemDraft (raw text), ItemEdit, ItemUpdate, NewSale │
//! │  Outputs: Renumbering (after delete), Receipt (after checkout)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Items are identified by a positive integer id. Under
//! [`IdPolicy::Renumber`] a delete compacts the remaining ids to `1..N`, so
//! anything holding an id must follow the returned [`Renumbering`].

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::line_items;
use crate::money::Money;
use crate::validation::{
    parse_price, parse_quantity, validate_item_name, validate_new_quantity, validate_price,
    validate_stock_quantity, ValidationResult,
};

// =============================================================================
// Timestamps
// =============================================================================

/// Storage and display format of sale timestamps (local time, seconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a sale timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD HH:MM:SS` sale timestamp.
pub fn parse_timestamp(text: &str) -> ValidationResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        ValidationError::InvalidFormat {
            field: "timestamp".to_string(),
            reason: e.to_string(),
        }
    })
}

/// Drops sub-second precision; the ledger records whole seconds.
pub fn sale_timestamp(at: NaiveDateTime) -> NaiveDateTime {
    at.trunc_subsecs(0)
}

// =============================================================================
// Item
// =============================================================================

/// An item in the stock catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Positive integer id; dense `1..N` under the renumbering policy.
    pub id: i64,

    /// Display name, unique across the catalog (case-sensitive).
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units on hand, net of reservations held by open carts.
    pub quantity: i64,
}

impl Item {
    /// Catalog search predicate.
    ///
    /// Matches when the name contains `query` case-insensitively, or when
    /// `query` is an integer equal to the id. An empty query matches
    /// everything.
    ///
    /// ## Example
    /// ```rust
    /// use shopkeep_core::{Item, Money};
    ///
    /// let shirt = Item { id: 4, name: "Linen Shirt".into(), price: Money::from_cents(1000), quantity: 5 };
    /// assert!(shirt.matches_query("SHIRT"));
    /// assert!(shirt.matches_query("4"));
    /// assert!(!shirt.matches_query("hat"));
    /// ```
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }

        if query.parse::<i64>().map_or(false, |id| id == self.id) {
            return true;
        }

        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

// =============================================================================
// Item Inputs
// =============================================================================

/// A validated request to add one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    price: Money,
    quantity: i64,
}

impl NewItem {
    /// Validates the fields of a new item.
    ///
    /// ## Rules
    /// - name: non-empty after trimming, at most 200 characters
    /// - price: > 0
    /// - quantity: > 0
    pub fn new(name: &str, price: Money, quantity: i64) -> ValidationResult<Self> {
        let name = validate_item_name(name)?;
        validate_price(price)?;
        validate_new_quantity(quantity)?;

        Ok(NewItem {
            name,
            price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// One raw-text row of a batch add, exactly as the operator typed it.
///
/// Missing fields deserialize as empty text so that an incomplete row is
/// reported as such instead of failing to parse the whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: impl Into<String>, quantity: impl Into<String>) -> Self {
        ItemDraft {
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Parses and validates the row into a [`NewItem`].
    pub fn parse(&self) -> ValidationResult<NewItem> {
        let price = parse_price(&self.price)?;
        let quantity = parse_quantity("quantity", &self.quantity)?;
        NewItem::new(&self.name, price, quantity)
    }
}

/// A validated full-record edit of an existing item.
///
/// Unlike [`NewItem`], the quantity may be zero (sold out).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEdit {
    name: String,
    price: Money,
    quantity: i64,
}

impl ItemEdit {
    pub fn new(name: &str, price: Money, quantity: i64) -> ValidationResult<Self> {
        let name = validate_item_name(name)?;
        validate_price(price)?;
        validate_stock_quantity(quantity)?;

        Ok(ItemEdit {
            name,
            price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Editable item fields (the id is never editable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemField {
    Name,
    Price,
    Quantity,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemField::Name => "name",
            ItemField::Price => "price",
            ItemField::Quantity => "quantity",
        };
        f.write_str(s)
    }
}

impl FromStr for ItemField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ItemField::Name),
            "price" => Ok(ItemField::Price),
            "quantity" | "qty" => Ok(ItemField::Quantity),
            other => Err(ValidationError::InvalidFormat {
                field: "field".to_string(),
                reason: format!("unknown item field '{other}' (expected name, price or quantity)"),
            }),
        }
    }
}

/// A single-field update of an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUpdate {
    Name(String),
    Price(Money),
    Quantity(i64),
}

impl ItemUpdate {
    /// Parses a raw-text value for `field` and applies that field's rule.
    ///
    /// ## Example
    /// ```rust
    /// use shopkeep_core::{ItemField, ItemUpdate, Money};
    ///
    /// let update = ItemUpdate::from_text(ItemField::Price, "12.50").unwrap();
    /// assert_eq!(update, ItemUpdate::Price(Money::from_cents(1250)));
    /// assert!(ItemUpdate::from_text(ItemField::Quantity, "-1").is_err());
    /// ```
    pub fn from_text(field: ItemField, raw: &str) -> ValidationResult<Self> {
        let update = match field {
            ItemField::Name => ItemUpdate::Name(raw.to_string()),
            ItemField::Price => ItemUpdate::Price(parse_price(raw)?),
            ItemField::Quantity => ItemUpdate::Quantity(parse_quantity("quantity", raw)?),
        };
        update.validated()
    }

    /// Applies the per-field rule; names come back trimmed.
    pub fn validated(self) -> ValidationResult<Self> {
        match self {
            ItemUpdate::Name(name) => Ok(ItemUpdate::Name(validate_item_name(&name)?)),
            ItemUpdate::Price(price) => {
                validate_price(price)?;
                Ok(ItemUpdate::Price(price))
            }
            ItemUpdate::Quantity(qty) => {
                validate_stock_quantity(qty)?;
                Ok(ItemUpdate::Quantity(qty))
            }
        }
    }

    pub fn field(&self) -> ItemField {
        match self {
            ItemUpdate::Name(_) => ItemField::Name,
            ItemUpdate::Price(_) => ItemField::Price,
            ItemUpdate::Quantity(_) => ItemField::Quantity,
        }
    }
}

// =============================================================================
// Identifier Policy & Renumbering
// =============================================================================

/// What happens to the other items' ids when one item is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Compact the remaining ids to `1..N` (in old-id order) after a delete
    /// and reset the id generator to `N`.
    #[default]
    Renumber,

    /// Ids are never changed nor reused.
    Stable,
}

impl FromStr for IdPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "renumber" => Ok(IdPolicy::Renumber),
            "stable" => Ok(IdPolicy::Stable),
            other => Err(ValidationError::InvalidFormat {
                field: "id policy".to_string(),
                reason: format!("'{other}' is not one of: renumber, stable"),
            }),
        }
    }
}

/// One id reassignment performed by renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IdMove {
    pub from: i64,
    pub to: i64,
}

/// Outcome of deleting an item: which id went away and which ids moved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Renumbering {
    pub deleted_id: i64,
    pub moves: Vec<IdMove>,
}

impl Renumbering {
    /// Maps an id held before the delete to the id it has now.
    ///
    /// Returns `None` for the deleted id.
    pub fn resolve(&self, id: i64) -> Option<i64> {
        if id == self.deleted_id {
            return None;
        }

        Some(
            self.moves
                .iter()
                .find(|m| m.from == id)
                .map_or(id, |m| m.to),
        )
    }

    /// True when no surviving item changed id.
    pub fn is_identity(&self) -> bool {
        self.moves.is_empty()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a recorded sale, frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    /// Catalog id at the time of sale. Informational only: ids may have
    /// been renumbered or deleted since.
    pub item_id: Option<i64>,

    /// Item name at the time of sale.
    pub item_name: String,

    pub quantity: i64,

    /// Unit price at the time of sale.
    pub unit_price: Money,
}

impl SaleLine {
    /// unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A completed sale as stored in the ledger. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,

    #[ts(as = "String")]
    pub timestamp: NaiveDateTime,

    /// Display summary, `"Name x Qty, Name x Qty"`.
    pub summary: String,

    pub total: Money,

    /// Structured lines. Empty for sales recorded from a summary alone.
    pub lines: Vec<SaleLine>,
}

impl Sale {
    /// `(item name, units)` per line, in cart order.
    ///
    /// Uses the structured lines when the sale has them, otherwise parses
    /// the summary text.
    pub fn line_quantities(&self) -> CoreResult<Vec<(String, i64)>> {
        if self.lines.is_empty() {
            return line_items::parse_summary(&self.summary);
        }

        Ok(self
            .lines
            .iter()
            .map(|l| (l.item_name.clone(), l.quantity))
            .collect())
    }
}

/// A sale about to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub timestamp: NaiveDateTime,
    pub summary: String,
    pub total: Money,
    pub lines: Vec<SaleLine>,
}

impl NewSale {
    /// Builds a sale from structured lines; summary and total are derived.
    pub fn from_lines(timestamp: NaiveDateTime, lines: Vec<SaleLine>) -> Self {
        let total = lines.iter().map(SaleLine::line_total).sum();
        let summary = line_items::render_summary(
            lines.iter().map(|l| (l.item_name.as_str(), l.quantity)),
        );

        NewSale {
            timestamp: sale_timestamp(timestamp),
            summary,
            total,
            lines,
        }
    }

    /// Builds a summary-only sale (no structured lines).
    pub fn from_summary(timestamp: NaiveDateTime, summary: impl Into<String>, total: Money) -> Self {
        NewSale {
            timestamp: sale_timestamp(timestamp),
            summary: summary.into(),
            total,
            lines: Vec::new(),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Result of a successful checkout, for the front end to display or print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub sale: Sale,
    pub tendered: Money,
    pub change: Money,
}

impl Receipt {
    /// Builds a receipt, refusing a payment that doesn't cover the total.
    pub fn settle(sale: Sale, tendered: Money) -> CoreResult<Self> {
        if tendered < sale.total {
            return Err(CoreError::InsufficientPayment {
                total: sale.total,
                tendered,
            });
        }

        let change = tendered - sale.total;
        Ok(Receipt {
            sale,
            tendered,
            change,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(10, 30, 0))
            .unwrap()
    }

    fn shirt() -> Item {
        Item {
            id: 1,
            name: "Shirt".to_string(),
            price: Money::from_cents(1000),
            quantity: 5,
        }
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = parse_timestamp("2024-03-05 14:07:09").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-05 14:07:09");
        assert!(parse_timestamp("2024-03-05T14:07:09").is_err());
    }

    #[test]
    fn test_sale_timestamp_drops_subseconds() {
        let ts = at(2024, 1, 2)
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();
        assert_eq!(format_timestamp(&sale_timestamp(ts)), "2024-01-02 10:30:00");
    }

    #[test]
    fn test_matches_query() {
        let item = shirt();
        assert!(item.matches_query(""));
        assert!(item.matches_query("hir"));
        assert!(item.matches_query("SHIRT"));
        assert!(item.matches_query("1"));
        assert!(!item.matches_query("2"));
        assert!(!item.matches_query("hat"));
    }

    #[test]
    fn test_new_item_validation() {
        let item = NewItem::new(" Hat ", Money::from_cents(500), 2).unwrap();
        assert_eq!(item.name(), "Hat");

        assert!(NewItem::new("", Money::from_cents(500), 2).is_err());
        assert!(NewItem::new("Hat", Money::zero(), 2).is_err());
        assert!(NewItem::new("Hat", Money::from_cents(500), 0).is_err());
    }

    #[test]
    fn test_item_edit_allows_zero_stock() {
        assert!(ItemEdit::new("Hat", Money::from_cents(500), 0).is_ok());
        assert!(ItemEdit::new("Hat", Money::from_cents(500), -1).is_err());
    }

    #[test]
    fn test_item_draft_parse() {
        let draft = ItemDraft::new("Scarf", "7.25", "4");
        let item = draft.parse().unwrap();
        assert_eq!(item.price().cents(), 725);
        assert_eq!(item.quantity(), 4);

        let incomplete = ItemDraft::new("Scarf", "", "4");
        assert!(matches!(
            incomplete.parse(),
            Err(ValidationError::Required { .. })
        ));

        let negative = ItemDraft::new("Scarf", "-3", "4");
        assert!(negative.parse().is_err());
    }

    #[test]
    fn test_item_draft_missing_fields_deserialize_empty() {
        let draft: ItemDraft = serde_json::from_str(r#"{"name": "Belt"}"#).unwrap();
        assert_eq!(draft.price, "");
        assert!(draft.parse().is_err());
    }

    #[test]
    fn test_item_update_from_text() {
        assert_eq!(
            ItemUpdate::from_text(ItemField::Name, "  Cap ").unwrap(),
            ItemUpdate::Name("Cap".to_string())
        );
        assert_eq!(
            ItemUpdate::from_text(ItemField::Quantity, "0").unwrap(),
            ItemUpdate::Quantity(0)
        );
        assert!(ItemUpdate::from_text(ItemField::Price, "0").is_err());
        assert!(ItemUpdate::from_text(ItemField::Name, "  ").is_err());
    }

    #[test]
    fn test_item_field_from_str() {
        assert_eq!("Price".parse::<ItemField>().unwrap(), ItemField::Price);
        assert_eq!("qty".parse::<ItemField>().unwrap(), ItemField::Quantity);
        assert!("id".parse::<ItemField>().is_err());
    }

    #[test]
    fn test_id_policy_from_str() {
        assert_eq!("stable".parse::<IdPolicy>().unwrap(), IdPolicy::Stable);
        assert_eq!(IdPolicy::default(), IdPolicy::Renumber);
        assert!("dense".parse::<IdPolicy>().is_err());
    }

    #[test]
    fn test_renumbering_resolve() {
        let renumbering = Renumbering {
            deleted_id: 2,
            moves: vec![IdMove { from: 3, to: 2 }, IdMove { from: 4, to: 3 }],
        };

        assert_eq!(renumbering.resolve(1), Some(1));
        assert_eq!(renumbering.resolve(2), None);
        assert_eq!(renumbering.resolve(3), Some(2));
        assert_eq!(renumbering.resolve(4), Some(3));
        assert!(!renumbering.is_identity());
    }

    #[test]
    fn test_new_sale_from_lines() {
        let sale = NewSale::from_lines(
            at(2024, 5, 1),
            vec![
                SaleLine {
                    item_id: Some(1),
                    item_name: "Shirt".to_string(),
                    quantity: 2,
                    unit_price: Money::from_cents(1000),
                },
                SaleLine {
                    item_id: Some(2),
                    item_name: "Hat".to_string(),
                    quantity: 1,
                    unit_price: Money::from_cents(500),
                },
            ],
        );

        assert_eq!(sale.summary, "Shirt x 2, Hat x 1");
        assert_eq!(sale.total.cents(), 2500);
    }

    #[test]
    fn test_line_quantities_falls_back_to_summary() {
        let sale = Sale {
            id: 1,
            timestamp: at(2024, 5, 1),
            summary: "Shirt x 2, Hat x 1".to_string(),
            total: Money::from_cents(2500),
            lines: Vec::new(),
        };

        assert_eq!(
            sale.line_quantities().unwrap(),
            vec![("Shirt".to_string(), 2), ("Hat".to_string(), 1)]
        );
    }

    #[test]
    fn test_receipt_settle() {
        let sale = Sale {
            id: 1,
            timestamp: at(2024, 5, 1),
            summary: "Shirt x 3".to_string(),
            total: Money::from_cents(3000),
            lines: Vec::new(),
        };

        let receipt = Receipt::settle(sale.clone(), Money::from_cents(5000)).unwrap();
        assert_eq!(receipt.change.cents(), 2000);

        let err = Receipt::settle(sale, Money::from_cents(2999)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientPayment { .. }));
    }
}
