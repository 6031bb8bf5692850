//! Printing command results as text tables or JSON.

use serde::Serialize;
use shopkeep_core::{Item, Receipt, Renumbering, Sale, SalesReport};

use crate::config::AppConfig;
use crate::error::CliError;

/// Where a command's result goes: stdout, as JSON or text.
pub(crate) struct Output {
    json: bool,
    config: AppConfig,
}

impl Output {
    pub(crate) fn new(json: bool, config: AppConfig) -> Self {
        Output { json, config }
    }

    /// Prints `value` as pretty JSON, or the text from `render`.
    pub(crate) fn emit<T, F>(&self, value: &T, render: F) -> Result<(), CliError>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&AppConfig) -> String,
    {
        if self.json {
            let text = serde_json::to_string_pretty(value)
                .map_err(|e| CliError::internal(format!("Could not encode output: {e}")))?;
            println!("{text}");
        } else {
            println!("{}", render(&self.config));
        }
        Ok(())
    }
}

/// Prints a failed command to stderr.
pub(crate) fn report_error(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("error: {err}"),
        }
    } else {
        eprintln!("error: {err}");
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

pub(crate) fn render_items(items: &[Item], config: &AppConfig) -> String {
    if items.is_empty() {
        return "No items.".to_string();
    }

    let mut lines = vec![format!("{:>4}  {:<28} {:>12} {:>6}", "ID", "NAME", "PRICE", "QTY")];
    for item in items {
        lines.push(format!(
            "{:>4}  {:<28} {:>12} {:>6}",
            item.id,
            item.name,
            config.format_currency(item.price),
            item.quantity
        ));
    }
    lines.join("\n")
}

pub(crate) fn render_item(item: &Item, config: &AppConfig) -> String {
    format!(
        "#{} {}  {}  ({} in stock)",
        item.id,
        item.name,
        config.format_currency(item.price),
        item.quantity
    )
}

pub(crate) fn render_renumbering(renumbering: &Renumbering) -> String {
    let mut lines = vec![format!("Deleted item #{}", renumbering.deleted_id)];
    for mv in &renumbering.moves {
        lines.push(format!("  #{} is now #{}", mv.from, mv.to));
    }
    lines.join("\n")
}

pub(crate) fn render_sales(sales: &[Sale], config: &AppConfig) -> String {
    if sales.is_empty() {
        return "No sales.".to_string();
    }

    sales
        .iter()
        .map(|sale| {
            format!(
                "{:>5}  {}  {:>12}  {}",
                format!("#{}", sale.id),
                shopkeep_core::format_timestamp(&sale.timestamp),
                config.format_currency(sale.total),
                sale.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A sale with its lines, as reprinted from the ledger.
pub(crate) fn render_sale(sale: &Sale, config: &AppConfig) -> String {
    let mut lines = vec![format!(
        "Sale #{}  {}",
        sale.id,
        shopkeep_core::format_timestamp(&sale.timestamp)
    )];

    if sale.lines.is_empty() {
        lines.push(format!("  {}", sale.summary));
    } else {
        for line in &sale.lines {
            lines.push(format!(
                "  {} x {} @ {}  {}",
                line.item_name,
                line.quantity,
                config.format_currency(line.unit_price),
                config.format_currency(line.line_total())
            ));
        }
    }

    lines.push(format!("{:<8}{}", "Total", config.format_currency(sale.total)));
    lines.join("\n")
}

pub(crate) fn render_receipt(receipt: &Receipt, config: &AppConfig) -> String {
    let mut text = render_sale(&receipt.sale, config);
    text.push_str(&format!(
        "\n{:<8}{}\n{:<8}{}",
        "Paid",
        config.format_currency(receipt.tendered),
        "Change",
        config.format_currency(receipt.change)
    ));
    text
}

pub(crate) fn render_report(report: &SalesReport, config: &AppConfig) -> String {
    let mut lines = vec![
        format!("{:<14}{}", "Sales:", report.sale_count),
        format!("{:<14}{}", "Revenue:", config.format_currency(report.total_revenue)),
        format!("{:<14}{}", "Average sale:", config.format_currency(report.average_sale)),
    ];

    if !report.units_per_item.is_empty() {
        lines.push("Units sold:".to_string());
        let width = report
            .units_per_item
            .iter()
            .map(|u| u.name.len())
            .max()
            .unwrap_or(0);
        for units in &report.units_per_item {
            lines.push(format!("  {:<width$}  {:>5}", units.name, units.units));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::{parse_timestamp, IdMove, ItemUnits, Money, SaleLine};

    fn shirt() -> Item {
        Item {
            id: 1,
            name: "Shirt".to_string(),
            price: Money::from_cents(1000),
            quantity: 5,
        }
    }

    fn shirt_sale() -> Sale {
        Sale {
            id: 7,
            timestamp: parse_timestamp("2024-02-10 11:00:00").unwrap(),
            summary: "Shirt x 3".to_string(),
            total: Money::from_cents(3000),
            lines: vec![SaleLine {
                item_id: Some(1),
                item_name: "Shirt".to_string(),
                quantity: 3,
                unit_price: Money::from_cents(1000),
            }],
        }
    }

    #[test]
    fn test_items_table() {
        let text = render_items(&[shirt()], &AppConfig::default());
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("NAME"));
        assert!(rows[1].contains("Shirt"));
        assert!(rows[1].contains("EG 10.00"));
        assert!(render_items(&[], &AppConfig::default()).contains("No items"));
    }

    #[test]
    fn test_receipt_shows_change() {
        let receipt = Receipt::settle(shirt_sale(), Money::from_cents(5000)).unwrap();
        let text = render_receipt(&receipt, &AppConfig::default());

        assert!(text.starts_with("Sale #7  2024-02-10 11:00:00"));
        assert!(text.contains("Shirt x 3 @ EG 10.00  EG 30.00"));
        assert!(text.contains("Paid    EG 50.00"));
        assert!(text.ends_with("Change  EG 20.00"));
    }

    #[test]
    fn test_summary_only_sale() {
        let mut sale = shirt_sale();
        sale.lines.clear();
        let text = render_sale(&sale, &AppConfig::default());
        assert!(text.contains("  Shirt x 3"));
    }

    #[test]
    fn test_report_text() {
        let report = SalesReport {
            sale_count: 2,
            total_revenue: Money::from_cents(5500),
            average_sale: Money::from_cents(2750),
            units_per_item: vec![
                ItemUnits {
                    name: "Shirt".to_string(),
                    units: 5,
                },
                ItemUnits {
                    name: "Hat".to_string(),
                    units: 1,
                },
            ],
        };
        let text = render_report(&report, &AppConfig::default());

        assert!(text.contains("Revenue:      EG 55.00"));
        assert!(text.contains("Average sale: EG 27.50"));
        assert!(text.contains("  Shirt      5"));
        assert!(text.contains("  Hat        1"));
    }

    #[test]
    fn test_renumbering_text() {
        let renumbering = Renumbering {
            deleted_id: 2,
            moves: vec![IdMove { from: 3, to: 2 }],
        };
        assert_eq!(
            render_renumbering(&renumbering),
            "Deleted item #2\n  #3 is now #2"
        );
    }
}
