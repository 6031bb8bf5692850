//! # Sales Analytics
//!
//! Date filtering and aggregation over ledger entries. Reads only; the
//! ledger is never modified from here.
//!
//! ```text
//!   all sales ──► filter_sales(year?, month?, day?) ──► aggregate() ──► SalesReport
//!                  omitted component = wildcard           revenue, average,
//!                  order preserved                        units per item
//! ```

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Sale;
use crate::validation::{parse_date_component, ValidationResult};

// =============================================================================
// Filter
// =============================================================================

/// Year/month/day filter. `None` matches anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl SalesFilter {
    /// Matches every sale.
    pub fn all() -> Self {
        SalesFilter::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }

    /// Builds a filter from raw text; blank components are wildcards.
    ///
    /// ## Example
    /// ```rust
    /// use shopkeep_core::analytics::SalesFilter;
    ///
    /// let filter = SalesFilter::from_text("2024", "", " 7 ").unwrap();
    /// assert_eq!(filter, SalesFilter::all().year(2024).day(7));
    /// assert!(SalesFilter::from_text("", "13", "").is_err());
    /// ```
    pub fn from_text(year: &str, month: &str, day: &str) -> ValidationResult<Self> {
        let year = parse_date_component("year", year, 1, 9999)?;
        let month = parse_date_component("month", month, 1, 12)?;
        let day = parse_date_component("day", day, 1, 31)?;

        // Ranges above guarantee these conversions succeed.
        Ok(SalesFilter {
            year: year.and_then(|y| i32::try_from(y).ok()),
            month: month.and_then(|m| u32::try_from(m).ok()),
            day: day.and_then(|d| u32::try_from(d).ok()),
        })
    }

    pub fn is_all(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// True when `timestamp` matches every supplied component.
    pub fn matches(&self, timestamp: &NaiveDateTime) -> bool {
        self.year.map_or(true, |y| timestamp.year() == y)
            && self.month.map_or(true, |m| timestamp.month() == m)
            && self.day.map_or(true, |d| timestamp.day() == d)
    }
}

/// Keeps the sales whose timestamp matches `filter`, in input order.
pub fn filter_sales<'a>(sales: &'a [Sale], filter: &SalesFilter) -> Vec<&'a Sale> {
    sales.iter().filter(|s| filter.matches(&s.timestamp)).collect()
}

// =============================================================================
// Aggregate
// =============================================================================

/// Units sold of one item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemUnits {
    pub name: String,
    pub units: i64,
}

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub sale_count: usize,
    pub total_revenue: Money,

    /// `total_revenue / sale_count` rounded to the cent; zero when empty.
    pub average_sale: Money,

    /// Units per item name, in first-seen order.
    pub units_per_item: Vec<ItemUnits>,
}

impl SalesReport {
    /// Units sold for `name` (0 if never sold in this set).
    pub fn units_for(&self, name: &str) -> i64 {
        self.units_per_item
            .iter()
            .find(|u| u.name == name)
            .map_or(0, |u| u.units)
    }
}

/// Computes revenue, average sale and per-item units.
///
/// Fails with [`CoreError::MalformedLineItems`](crate::CoreError) if a
/// summary-only sale cannot be parsed.
pub fn aggregate<'a, I>(sales: I) -> CoreResult<SalesReport>
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut report = SalesReport::default();

    for sale in sales {
        report.sale_count += 1;
        report.total_revenue = report
            .total_revenue
            .checked_add(sale.total)
            .ok_or_else(|| too_large("revenue"))?;

        for (name, units) in sale.line_quantities()? {
            match report.units_per_item.iter_mut().find(|u| u.name == name) {
                Some(entry) => {
                    entry.units = entry
                        .units
                        .checked_add(units)
                        .ok_or_else(|| too_large("units sold"))?;
                }
                None => report.units_per_item.push(ItemUnits { name, units }),
            }
        }
    }

    report.average_sale = report.total_revenue.divide_rounded(report.sale_count);
    Ok(report)
}

fn too_large(field: &str) -> CoreError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: i64::MAX.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_timestamp;

    fn sale(id: i64, ts: &str, summary: &str, total_cents: i64) -> Sale {
        Sale {
            id,
            timestamp: parse_timestamp(ts).unwrap(),
            summary: summary.to_string(),
            total: Money::from_cents(total_cents),
            lines: Vec::new(),
        }
    }

    fn ledger() -> Vec<Sale> {
        vec![
            sale(1, "2023-12-31 23:59:59", "Shirt x 1", 1000),
            sale(2, "2024-01-15 10:00:00", "Shirt x 2, Hat x 1", 2500),
            sale(3, "2024-03-15 12:30:00", "Hat x 4", 2000),
            sale(4, "2024-03-16 09:15:00", "Scarf x 1, Shirt x 1", 1700),
        ]
    }

    #[test]
    fn test_filter_by_year() {
        let sales = ledger();
        let filtered = filter_sales(&sales, &SalesFilter::all().year(2024));
        let ids: Vec<i64> = filtered.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_filter_wildcards() {
        let sales = ledger();

        let fifteenth = filter_sales(&sales, &SalesFilter::all().day(15));
        assert_eq!(fifteenth.len(), 2);

        let march = filter_sales(&sales, &SalesFilter::all().year(2024).month(3));
        assert_eq!(march.len(), 2);

        assert_eq!(filter_sales(&sales, &SalesFilter::all()).len(), 4);
    }

    #[test]
    fn test_year_revenue_equals_sum_of_year_totals() {
        let sales = ledger();
        let filter = SalesFilter::from_text("2024", "", "").unwrap();
        let report = aggregate(filter_sales(&sales, &filter)).unwrap();

        let expected: Money = sales
            .iter()
            .filter(|s| s.timestamp.year() == 2024)
            .map(|s| s.total)
            .sum();
        assert_eq!(report.total_revenue, expected);
        assert_eq!(report.sale_count, 3);
    }

    #[test]
    fn test_aggregate_shirt_and_hat() {
        let sales = vec![
            sale(1, "2024-05-01 10:00:00", "Shirt x 2, Hat x 1", 2500),
            sale(2, "2024-05-02 11:00:00", "Shirt x 3", 3000),
        ];

        let report = aggregate(&sales).unwrap();
        assert_eq!(report.total_revenue.cents(), 5500);
        assert_eq!(report.average_sale.cents(), 2750);
        assert_eq!(report.units_for("Shirt"), 5);
        assert_eq!(report.units_for("Hat"), 1);
        assert_eq!(report.units_per_item[0].name, "Shirt");
    }

    #[test]
    fn test_aggregate_empty() {
        let report = aggregate(std::iter::empty::<&Sale>()).unwrap();
        assert_eq!(report.sale_count, 0);
        assert!(report.total_revenue.is_zero());
        assert!(report.average_sale.is_zero());
        assert!(report.units_per_item.is_empty());
    }

    #[test]
    fn test_average_rounds_to_cent() {
        let sales = vec![
            sale(1, "2024-05-01 10:00:00", "Pin x 1", 100),
            sale(2, "2024-05-01 10:01:00", "Pin x 1", 100),
            sale(3, "2024-05-01 10:02:00", "Pin x 1", 101),
        ];
        assert_eq!(aggregate(&sales).unwrap().average_sale.cents(), 100);
    }

    #[test]
    fn test_aggregate_prefers_structured_lines() {
        let mut s = sale(1, "2024-05-01 10:00:00", "Tee, Large x 2", 2000);
        s.lines = vec![crate::types::SaleLine {
            item_id: Some(1),
            item_name: "Tee, Large".to_string(),
            quantity: 2,
            unit_price: Money::from_cents(1000),
        }];

        let report = aggregate([&s]).unwrap();
        assert_eq!(report.units_for("Tee, Large"), 2);
    }

    #[test]
    fn test_aggregate_reports_malformed_summary() {
        let sales = vec![sale(1, "2024-05-01 10:00:00", "Shirt x 2, ???", 2000)];
        let err = aggregate(&sales).unwrap_err();
        assert!(matches!(err, CoreError::MalformedLineItems { .. }));
    }

    #[test]
    fn test_aggregate_refuses_overflowing_revenue() {
        let sales = vec![
            sale(1, "2024-05-01 10:00:00", "Shirt x 1", i64::MAX),
            sale(2, "2024-05-02 10:00:00", "Shirt x 1", 1),
        ];
        let err = aggregate(&sales).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
    }
}
