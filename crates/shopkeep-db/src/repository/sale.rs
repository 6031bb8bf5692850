//! # Sale Repository
//!
//! The append-only sales ledger.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Recorded Sale                                 │
//! │                                                                         │
//! │  sales                                                                 │
//! │  ┌────┬─────────────────────┬──────────────────────┬───────┐           │
//! │  │ id │ timestamp           │ items (summary)      │ total │           │
//! │  │ 7  │ 2024-05-01 10:00:00 │ Shirt x 2, Hat x 1   │ 25.0  │           │
//! │  └────┴─────────────────────┴──────────────────────┴───────┘           │
//! │                                                                         │
//! │  sale_lines (authoritative when present)                               │
//! │  ┌─────────┬──────────┬─────────┬───────────┬─────┬──────────────────┐ │
//! │  │ sale_id │ position │ item_id │ item_name │ qty │ unit_price_cents │ │
//! │  │ 7       │ 0        │ 1       │ Shirt     │ 2   │ 1000             │ │
//! │  │ 7       │ 1        │ 2       │ Hat       │ 1   │ 500              │ │
//! │  └─────────┴──────────┴─────────┴───────────┴─────┴──────────────────┘ │
//! │                                                                         │
//! │  Sales from older files or recorded from a summary have no lines.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no update or delete: the ledger only grows.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shopkeep_core::{
    format_timestamp, parse_timestamp, Money, NewSale, Sale, SaleLine, SalesFilter,
};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    timestamp: String,
    items: String,
    total: f64,
}

impl SaleRow {
    fn into_sale(self, lines: Vec<SaleLine>) -> DbResult<Sale> {
        let timestamp =
            parse_timestamp(&self.timestamp).map_err(|e| DbError::corrupt("sales.timestamp", e))?;

        Ok(Sale {
            id: self.id,
            timestamp,
            summary: self.items,
            total: Money::from_major_f64(self.total),
            lines,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    sale_id: i64,
    item_id: Option<i64>,
    item_name: String,
    quantity: i64,
    unit_price_cents: i64,
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        SaleLine {
            item_id: row.item_id,
            item_name: row.item_name,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
        }
    }
}

const SALE_COLUMNS: &str = "id, timestamp, items, total";
const LINE_COLUMNS: &str = "sale_id, item_id, item_name, quantity, unit_price_cents";

/// Date filter over `sales.timestamp`; binds year, month, day (NULL = any).
const PERIOD_FILTER: &str = "\
    (?1 IS NULL OR CAST(strftime('%Y', timestamp) AS INTEGER) = ?1) \
    AND (?2 IS NULL OR CAST(strftime('%m', timestamp) AS INTEGER) = ?2) \
    AND (?3 IS NULL OR CAST(strftime('%d', timestamp) AS INTEGER) = ?3)";

/// Groups line rows by sale id, keeping position order.
fn group_lines(rows: Vec<SaleLineRow>) -> HashMap<i64, Vec<SaleLine>> {
    let mut grouped: HashMap<i64, Vec<SaleLine>> = HashMap::new();
    for row in rows {
        grouped.entry(row.sale_id).or_default().push(row.into());
    }
    grouped
}

fn assemble(rows: Vec<SaleRow>, lines: Vec<SaleLineRow>) -> DbResult<Vec<Sale>> {
    let mut grouped = group_lines(lines);
    rows.into_iter()
        .map(|row| {
            let lines = grouped.remove(&row.id).unwrap_or_default();
            row.into_sale(lines)
        })
        .collect()
}

// =============================================================================
// Connection-Level Operations
// =============================================================================

/// Appends a sale and its lines on the given connection.
///
/// Callers wrap this in a transaction so the sale and its lines land
/// together.
pub(crate) async fn insert_sale(conn: &mut SqliteConnection, sale: &NewSale) -> DbResult<Sale> {
    let result = sqlx::query("INSERT INTO sales (timestamp, items, total) VALUES (?1, ?2, ?3)")
        .bind(format_timestamp(&sale.timestamp))
        .bind(&sale.summary)
        .bind(sale.total.to_major_f64())
        .execute(&mut *conn)
        .await?;

    let sale_id = result.last_insert_rowid();

    for (position, line) in (0_i64..).zip(sale.lines.iter()) {
        sqlx::query(
            "INSERT INTO sale_lines \
             (sale_id, position, item_id, item_name, quantity, unit_price_cents) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(sale_id)
        .bind(position)
        .bind(line.item_id)
        .bind(&line.item_name)
        .bind(line.quantity)
        .bind(line.unit_price.cents())
        .execute(&mut *conn)
        .await?;
    }

    Ok(Sale {
        id: sale_id,
        timestamp: sale.timestamp,
        summary: sale.summary.clone(),
        total: sale.total,
        lines: sale.lines.clone(),
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale with its structured lines, atomically.
    pub async fn record_sale(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(
            summary = %sale.summary,
            total = %sale.total,
            lines = sale.lines.len(),
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;
        let recorded = insert_sale(&mut tx, sale).await?;
        tx.commit().await?;

        info!(id = recorded.id, total = %recorded.total, "Sale recorded");
        Ok(recorded)
    }

    /// Appends a sale known only by its summary text and total.
    pub async fn record_summary_sale(
        &self,
        timestamp: NaiveDateTime,
        summary: &str,
        total: Money,
    ) -> DbResult<Sale> {
        self.record_sale(&NewSale::from_summary(timestamp, summary, total))
            .await
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, SaleLineRow>(&format!(
            "SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1 ORDER BY position"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_sale(lines.into_iter().map(SaleLine::from).collect())
            .map(Some)
    }

    /// Every sale, oldest first.
    pub async fn all_sales(&self) -> DbResult<Vec<Sale>> {
        self.sales_in_period(&SalesFilter::all()).await
    }

    /// Sales whose timestamp matches the filter, oldest first.
    ///
    /// Omitted components match anything.
    pub async fn sales_in_period(&self, filter: &SalesFilter) -> DbResult<Vec<Sale>> {
        debug!(
            year = ?filter.year,
            month = ?filter.month,
            day = ?filter.day,
            "Loading sales"
        );

        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE {PERIOD_FILTER} ORDER BY id"
        ))
        .bind(filter.year)
        .bind(filter.month)
        .bind(filter.day)
        .fetch_all(&self.pool)
        .await?;

        let lines = sqlx::query_as::<_, SaleLineRow>(&format!(
            "SELECT {LINE_COLUMNS} FROM sale_lines \
             WHERE sale_id IN (SELECT id FROM sales WHERE {PERIOD_FILTER}) \
             ORDER BY sale_id, position"
        ))
        .bind(filter.year)
        .bind(filter.month)
        .bind(filter.day)
        .fetch_all(&self.pool)
        .await?;

        let sales = assemble(rows, lines)?;
        debug!(count = sales.len(), "Sales loaded");
        Ok(sales)
    }

    /// Counts recorded sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
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

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn ts(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    fn line(name: &str, qty: i64, cents: i64) -> SaleLine {
        SaleLine {
            item_id: None,
            item_name: name.to_string(),
            quantity: qty,
            unit_price: Money::from_cents(cents),
        }
    }

    #[tokio::test]
    async fn test_record_and_get_sale() {
        let db = setup().await;

        let sale = NewSale::from_lines(
            ts("2024-05-01 10:00:00"),
            vec![line("Shirt", 2, 1000), line("Hat", 1, 500)],
        );
        let recorded = db.sales().record_sale(&sale).await.unwrap();
        assert_eq!(recorded.id, 1);

        let loaded = db.sales().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(loaded.summary, "Shirt x 2, Hat x 1");
        assert_eq!(loaded.total.cents(), 2500);
        assert_eq!(loaded.lines.len(), 2);
        assert_eq!(loaded.lines[1].item_name, "Hat");
        assert_eq!(format_timestamp(&loaded.timestamp), "2024-05-01 10:00:00");

        assert!(db.sales().get_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_only_sale() {
        let db = setup().await;

        db.sales()
            .record_summary_sale(ts("2024-01-02 09:00:00"), "Shirt x 3", Money::from_cents(3000))
            .await
            .unwrap();

        let sales = db.sales().all_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert!(sales[0].lines.is_empty());
        assert_eq!(
            sales[0].line_quantities().unwrap(),
            vec![("Shirt".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_ids_increase_and_order_is_oldest_first() {
        let db = setup().await;

        for (i, day) in ["2024-03-01", "2024-01-01", "2024-02-01"].iter().enumerate() {
            let recorded = db
                .sales()
                .record_summary_sale(
                    ts(&format!("{day} 12:00:00")),
                    "Hat x 1",
                    Money::from_cents(500),
                )
                .await
                .unwrap();
            assert_eq!(recorded.id, i as i64 + 1);
        }

        let ids: Vec<i64> = db
            .sales()
            .all_sales()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_sales_in_period() {
        let db = setup().await;
        let entries = [
            ("2023-12-31 23:59:59", 1000),
            ("2024-01-15 10:00:00", 2500),
            ("2024-03-15 12:30:00", 2000),
        ];
        for (when, cents) in entries {
            db.sales()
                .record_sale(&NewSale::from_lines(ts(when), vec![line("Hat", 1, cents)]))
                .await
                .unwrap();
        }

        let in_2024 = db
            .sales()
            .sales_in_period(&SalesFilter::all().year(2024))
            .await
            .unwrap();
        assert_eq!(in_2024.len(), 2);
        assert!(in_2024.iter().all(|s| s.lines.len() == 1));

        let fifteenth = db
            .sales()
            .sales_in_period(&SalesFilter::all().day(15))
            .await
            .unwrap();
        assert_eq!(fifteenth.len(), 2);

        let march = db
            .sales()
            .sales_in_period(&SalesFilter::all().year(2024).month(3))
            .await
            .unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].total.cents(), 2000);
    }
}
