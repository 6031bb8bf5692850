//! # Item Repository
//!
//! Database operations for the stock catalog.
//!
//! ## Key Operations
//! - Add (single and all-or-nothing batch)
//! - Edit / single-field update
//! - Delete, with id renumbering under [`IdPolicy::Renumber`]
//! - Guarded stock decrement (never below zero) and restock
//!
//! ## Renumbering After Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    DELETE id=2 (IdPolicy::Renumber)                     │
//! │                                                                         │
//! │  before           after delete        after renumber                   │
//! │  ┌────┬───────┐   ┌────┬───────┐      ┌────┬───────┐                   │
//! │  │ 1  │ Shirt │   │ 1  │ Shirt │      │ 1  │ Shirt │                   │
//! │  │ 2  │ Hat   │   │ 3  │ Scarf │ ──►  │ 2  │ Scarf │  move 3 → 2       │
//! │  │ 3  │ Scarf │   │ 5  │ Belt  │      │ 3  │ Belt  │  move 5 → 3       │
//! │  │ 5  │ Belt  │   └────┴───────┘      └────┴───────┘                   │
//! │  └────┴───────┘                                                         │
//! │                                        sqlite_sequence.seq = 3          │
//! │                                        next add gets id 4               │
//! │                                                                         │
//! │  Ids are rewritten in ascending order, so each target id is free.      │
//! │  Delete + renumber + sequence reset commit as one transaction.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shopkeep_core::validation::validate_search_query;
use shopkeep_core::{
    CoreError, IdMove, IdPolicy, Item, ItemDraft, ItemEdit, ItemUpdate, Money, NewItem,
    Renumbering, MAX_ITEM_QUANTITY,
};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw `items` row. Prices are stored as REAL major units.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    price: f64,
    quantity: i64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            price: Money::from_major_f64(row.price),
            quantity: row.quantity,
        }
    }
}

const ITEM_COLUMNS: &str = "id, name, price, quantity";

/// Maps a UNIQUE(name) failure to the domain's duplicate-name error.
fn name_conflict(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } if field.contains("items.name") => {
            CoreError::DuplicateName {
                name: name.to_string(),
            }
            .into()
        }
        other => other,
    }
}

// =============================================================================
// Connection-Level Operations
// =============================================================================
// Shared with the checkout engine so cart operations can run inside its own
// transactions.

pub(crate) async fn fetch_item(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Item>> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(Item::from))
}

pub(crate) async fn insert_item(conn: &mut SqliteConnection, item: &NewItem) -> DbResult<Item> {
    let result = sqlx::query("INSERT INTO items (name, price, quantity) VALUES (?1, ?2, ?3)")
        .bind(item.name())
        .bind(item.price().to_major_f64())
        .bind(item.quantity())
        .execute(&mut *conn)
        .await
        .map_err(|e| name_conflict(e, item.name()))?;

    Ok(Item {
        id: result.last_insert_rowid(),
        name: item.name().to_string(),
        price: item.price(),
        quantity: item.quantity(),
    })
}

/// Subtracts `amount` from stock, refusing to go below zero.
///
/// The check and the write are one guarded UPDATE, so two reservations can
/// never both take the last unit.
pub(crate) async fn reserve_stock(
    conn: &mut SqliteConnection,
    id: i64,
    amount: i64,
) -> DbResult<Item> {
    if amount <= 0 {
        return Err(CoreError::InvalidQuantity { requested: amount }.into());
    }

    let updated = sqlx::query_as::<_, ItemRow>(&format!(
        "UPDATE items SET quantity = quantity - ?2 \
         WHERE id = ?1 AND quantity >= ?2 \
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(id)
    .bind(amount)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = updated {
        return Ok(row.into());
    }

    // Nothing updated: either the item is gone or the stock is short.
    match fetch_item(conn, id).await? {
        None => Err(CoreError::ItemNotFound(id).into()),
        Some(item) => Err(CoreError::InsufficientStock {
            name: item.name,
            available: item.quantity,
            requested: amount,
        }
        .into()),
    }
}

/// Adds `amount` back to stock.
pub(crate) async fn restock(conn: &mut SqliteConnection, id: i64, amount: i64) -> DbResult<Item> {
    if amount <= 0 || amount > MAX_ITEM_QUANTITY {
        return Err(CoreError::InvalidQuantity { requested: amount }.into());
    }

    let updated = sqlx::query_as::<_, ItemRow>(&format!(
        "UPDATE items SET quantity = quantity + ?2 WHERE id = ?1 RETURNING {ITEM_COLUMNS}"
    ))
    .bind(id)
    .bind(amount)
    .fetch_optional(&mut *conn)
    .await?;

    updated
        .map(Item::from)
        .ok_or_else(|| CoreError::ItemNotFound(id).into())
}

/// Compacts ids to `1..N` in old-id order and resets the id generator.
async fn renumber(conn: &mut SqliteConnection) -> DbResult<Vec<IdMove>> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM items ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    let mut moves = Vec::new();
    for (new_id, old_id) in (1_i64..).zip(ids.iter().copied()) {
        if new_id == old_id {
            continue;
        }

        sqlx::query("UPDATE items SET id = ?1 WHERE id = ?2")
            .bind(new_id)
            .bind(old_id)
            .execute(&mut *conn)
            .await?;
        moves.push(IdMove {
            from: old_id,
            to: new_id,
        });
    }

    // An empty catalog keeps its generator as-is.
    if let Some(max_id) = i64::try_from(ids.len()).ok().filter(|n| *n > 0) {
        sqlx::query("UPDATE sqlite_sequence SET seq = ?1 WHERE name = 'items'")
            .bind(max_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(moves)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let shirt = repo.add(&NewItem::new("Shirt", Money::from_cents(1000), 5)?).await?;
/// let hits = repo.search("shi").await?;
/// let renumbering = repo.delete(shirt.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
    id_policy: IdPolicy,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool, id_policy: IdPolicy) -> Self {
        ItemRepository { pool, id_policy }
    }

    /// The id policy applied when items are deleted.
    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Adds one item and returns it with its assigned id.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain(CoreError::DuplicateName))` - Name already taken
    pub async fn add(&self, item: &NewItem) -> DbResult<Item> {
        debug!(name = %item.name(), "Adding item");

        let mut conn = self.pool.acquire().await?;
        let added = insert_item(&mut conn, item).await?;

        info!(id = added.id, name = %added.name, "Item added");
        Ok(added)
    }

    /// Adds a batch of raw-text rows, all or nothing.
    ///
    /// Rows are handled in order inside one transaction: each is parsed,
    /// checked against the rows before it and inserted. The first bad row
    /// rejects the whole batch with [`CoreError::BatchRowRejected`]
    /// carrying its 1-based index.
    pub async fn add_batch(&self, drafts: &[ItemDraft]) -> DbResult<Vec<Item>> {
        debug!(rows = drafts.len(), "Adding item batch");

        let mut tx = self.pool.begin().await?;
        let mut added = Vec::with_capacity(drafts.len());
        let mut seen = HashSet::new();

        for (idx, draft) in drafts.iter().enumerate() {
            let row = idx + 1;
            let item = draft
                .parse()
                .map_err(|e| CoreError::from(e).at_batch_row(row))?;

            if !seen.insert(item.name().to_string()) {
                return Err(CoreError::DuplicateName {
                    name: item.name().to_string(),
                }
                .at_batch_row(row)
                .into());
            }

            match insert_item(&mut tx, &item).await {
                Ok(inserted) => added.push(inserted),
                Err(DbError::Domain(err)) => {
                    debug!(row, error = %err, "Batch row rejected, rolling back");
                    return Err(err.at_batch_row(row).into());
                }
                Err(err) => return Err(err),
            }
        }

        tx.commit().await?;

        info!(count = added.len(), "Item batch added");
        Ok(added)
    }

    /// Gets an item by its id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Gets an item by id, failing with `ItemNotFound` when absent.
    pub async fn find(&self, id: i64) -> DbResult<Item> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(id).into())
    }

    /// The whole catalog in id order.
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Searches the catalog, in id order.
    ///
    /// Matches a case-insensitive name substring, or the exact id when the
    /// query is an integer. An empty query returns everything.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Item>> {
        let query = validate_search_query(query).map_err(CoreError::from)?;

        debug!(query = %query, "Searching items");

        let items: Vec<Item> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|item| item.matches_query(&query))
            .collect();

        debug!(count = items.len(), "Search returned items");
        Ok(items)
    }

    /// Replaces name, price and quantity of an item in one statement.
    pub async fn edit(&self, id: i64, edit: &ItemEdit) -> DbResult<Item> {
        debug!(id, name = %edit.name(), "Editing item");

        let updated = sqlx::query_as::<_, ItemRow>(&format!(
            "UPDATE items SET name = ?2, price = ?3, quantity = ?4 \
             WHERE id = ?1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(edit.name())
        .bind(edit.price().to_major_f64())
        .bind(edit.quantity())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| name_conflict(e, edit.name()))?;

        updated
            .map(Item::from)
            .ok_or_else(|| CoreError::ItemNotFound(id).into())
    }

    /// Updates a single field. A rejected update changes nothing.
    pub async fn update(&self, id: i64, update: ItemUpdate) -> DbResult<Item> {
        let update = update.validated().map_err(CoreError::from)?;

        debug!(id, field = %update.field(), "Updating item field");

        let returning = format!("RETURNING {ITEM_COLUMNS}");
        let updated = match &update {
            ItemUpdate::Name(name) => sqlx::query_as::<_, ItemRow>(&format!(
                "UPDATE items SET name = ?2 WHERE id = ?1 {returning}"
            ))
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| name_conflict(e, name))?,

            ItemUpdate::Price(price) => sqlx::query_as::<_, ItemRow>(&format!(
                "UPDATE items SET price = ?2 WHERE id = ?1 {returning}"
            ))
            .bind(id)
            .bind(price.to_major_f64())
            .fetch_optional(&self.pool)
            .await?,

            ItemUpdate::Quantity(qty) => sqlx::query_as::<_, ItemRow>(&format!(
                "UPDATE items SET quantity = ?2 WHERE id = ?1 {returning}"
            ))
            .bind(id)
            .bind(*qty)
            .fetch_optional(&self.pool)
            .await?,
        };

        updated
            .map(Item::from)
            .ok_or_else(|| CoreError::ItemNotFound(id).into())
    }

    /// Deletes an item, renumbering the rest under [`IdPolicy::Renumber`].
    ///
    /// ## Returns
    /// The deleted id and every id move, for holders of item ids to follow.
    pub async fn delete(&self, id: i64) -> DbResult<Renumbering> {
        debug!(id, policy = ?self.id_policy, "Deleting item");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ItemNotFound(id).into());
        }

        let moves = match self.id_policy {
            IdPolicy::Renumber => renumber(&mut tx).await?,
            IdPolicy::Stable => Vec::new(),
        };

        tx.commit().await?;

        info!(id, moved = moves.len(), "Item deleted");
        Ok(Renumbering {
            deleted_id: id,
            moves,
        })
    }

    /// Subtracts `amount` from an item's stock.
    ///
    /// ## Returns
    /// * `Err(Domain(InsufficientStock))` - `amount` exceeds the stock
    /// * `Err(Domain(ItemNotFound))` - Unknown id
    pub async fn decrement_quantity(&self, id: i64, amount: i64) -> DbResult<Item> {
        debug!(id, amount, "Decrementing stock");

        let mut conn = self.pool.acquire().await?;
        reserve_stock(&mut conn, id, amount).await
    }

    /// Adds `amount` to an item's stock.
    pub async fn restock_quantity(&self, id: i64, amount: i64) -> DbResult<Item> {
        debug!(id, amount, "Restocking");

        let mut conn = self.pool.acquire().await?;
        restock(&mut conn, id, amount).await
    }

    /// Counts catalog items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup(policy: IdPolicy) -> Database {
        Database::new(DbConfig::in_memory().id_policy(policy))
            .await
            .unwrap()
    }

    fn new_item(name: &str, cents: i64, qty: i64) -> NewItem {
        NewItem::new(name, Money::from_cents(cents), qty).unwrap()
    }

    async fn seed(db: &Database, names: &[&str]) -> Vec<Item> {
        let mut items = Vec::new();
        for name in names {
            items.push(db.items().add(&new_item(name, 1000, 5)).await.unwrap());
        }
        items
    }

    #[tokio::test]
    async fn test_add_assigns_increasing_ids() {
        let db = setup(IdPolicy::Renumber).await;
        let items = seed(&db, &["Shirt", "Hat", "Scarf"]).await;

        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let hat = db.items().find(2).await.unwrap();
        assert_eq!(hat.name, "Hat");
        assert_eq!(hat.price.cents(), 1000);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        let err = db.items().add(&new_item("Shirt", 2000, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::DuplicateName { ref name }) if name == "Shirt"
        ));
        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        assert!(db.items().add(&new_item("shirt", 1000, 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        let drafts = vec![
            ItemDraft::new("Hat", "5", "3"),
            ItemDraft::new("Scarf", "", "2"),
        ];
        let err = db.items().add_batch(&drafts).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::BatchRowRejected { row: 2, .. })
        ));
        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_batch_rejects_catalog_collision_and_rolls_back() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        let drafts = vec![
            ItemDraft::new("Hat", "5", "3"),
            ItemDraft::new("Shirt", "12", "1"),
        ];
        let err = db.items().add_batch(&drafts).await.unwrap_err();
        match err {
            DbError::Domain(CoreError::BatchRowRejected { row, source }) => {
                assert_eq!(row, 2);
                assert!(matches!(*source, CoreError::DuplicateName { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(db.items().search("Hat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_reports_first_failing_row() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        // Row 1 collides with the catalog, row 2 is malformed.
        let drafts = vec![
            ItemDraft::new("Shirt", "12", "1"),
            ItemDraft::new("Hat", "", "1"),
        ];
        let err = db.items().add_batch(&drafts).await.unwrap_err();
        match err {
            DbError::Domain(CoreError::BatchRowRejected { row, source }) => {
                assert_eq!(row, 1);
                assert!(matches!(*source, CoreError::DuplicateName { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(db.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_batch_rejects_duplicate_within_batch() {
        let db = setup(IdPolicy::Renumber).await;

        let drafts = vec![
            ItemDraft::new("Hat", "5", "3"),
            ItemDraft::new("Hat", "6", "1"),
        ];
        assert!(db.items().add_batch(&drafts).await.is_err());
        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_success() {
        let db = setup(IdPolicy::Renumber).await;

        let drafts = vec![
            ItemDraft::new("Hat", "5", "3"),
            ItemDraft::new("Belt", "7.50", "2"),
        ];
        let added = db.items().add_batch(&drafts).await.unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(added[1].price.cents(), 750);
    }

    #[tokio::test]
    async fn test_search() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Linen Shirt", "Hat", "T-Shirt"]).await;

        let hits = db.items().search("SHIRT").await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let by_id = db.items().search("2").await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Hat");

        assert_eq!(db.items().search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_fields() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt", "Hat"]).await;

        let item = db
            .items()
            .update(1, ItemUpdate::Price(Money::from_cents(1250)))
            .await
            .unwrap();
        assert_eq!(item.price.cents(), 1250);

        let item = db.items().update(1, ItemUpdate::Quantity(0)).await.unwrap();
        assert_eq!(item.quantity, 0);

        // Renaming to its own name is not a conflict.
        assert!(db
            .items()
            .update(1, ItemUpdate::Name("Shirt".to_string()))
            .await
            .is_ok());

        let err = db
            .items()
            .update(1, ItemUpdate::Name("Hat".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::DuplicateName { .. })));
        assert_eq!(db.items().find(1).await.unwrap().name, "Shirt");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_value() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        let err = db.items().update(1, ItemUpdate::Quantity(-1)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(db.items().find(1).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_edit() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt"]).await;

        let edit = ItemEdit::new("Oxford Shirt", Money::from_cents(2500), 7).unwrap();
        let item = db.items().edit(1, &edit).await.unwrap();
        assert_eq!(item.name, "Oxford Shirt");
        assert_eq!(item.quantity, 7);

        let err = db.items().edit(99, &edit).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_renumbers_and_resets_sequence() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt", "Hat", "Scarf", "Belt"]).await;

        let renumbering = db.items().delete(2).await.unwrap();
        assert_eq!(
            renumbering.moves,
            vec![IdMove { from: 3, to: 2 }, IdMove { from: 4, to: 3 }]
        );

        let names: Vec<(i64, String)> = db
            .items()
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (1, "Shirt".to_string()),
                (2, "Scarf".to_string()),
                (3, "Belt".to_string())
            ]
        );

        let next = db.items().add(&new_item("Cap", 800, 1)).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_delete_last_item_leaves_sequence() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Shirt", "Hat"]).await;

        db.items().delete(1).await.unwrap();
        db.items().delete(1).await.unwrap();
        assert_eq!(db.items().count().await.unwrap(), 0);

        let next = db.items().add(&new_item("Cap", 800, 1)).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_delete_stable_policy_keeps_ids() {
        let db = setup(IdPolicy::Stable).await;
        seed(&db, &["Shirt", "Hat", "Scarf"]).await;

        let renumbering = db.items().delete(2).await.unwrap();
        assert!(renumbering.is_identity());
        assert_eq!(db.items().find(3).await.unwrap().name, "Scarf");

        let next = db.items().add(&new_item("Cap", 800, 1)).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let db = setup(IdPolicy::Renumber).await;
        let err = db.items().delete(5).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotFound(5))));
    }

    #[tokio::test]
    async fn test_decrement_quantity() {
        let db = setup(IdPolicy::Renumber).await;
        seed(&db, &["Hat"]).await;

        let hat = db.items().decrement_quantity(1, 5).await.unwrap();
        assert_eq!(hat.quantity, 0);

        let err = db.items().decrement_quantity(1, 1).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock { available: 0, requested: 1, .. })
        ));

        let err = db.items().decrement_quantity(9, 1).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ItemNotFound(9))));

        let hat = db.items().restock_quantity(1, 2).await.unwrap();
        assert_eq!(hat.quantity, 2);

        let err = db
            .items()
            .restock_quantity(1, MAX_ITEM_QUANTITY + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidQuantity { .. })));
    }
}
