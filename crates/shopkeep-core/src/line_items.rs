//! # Sale Summary Text
//!
//! Rendering and parsing of the human-readable line-item summary stored
//! with every sale:
//!
//! ```text
//! "Shirt x 2, Hat x 1"
//!  └──┬──┘   └─┬─┘
//!   name    quantity      entries joined by ", "
//! ```
//!
//! Parsing splits entries on `", "` and each entry on its LAST `" x "`, so
//! a name like `"Box x Large"` survives. A name containing `", "` does not;
//! that is why new sales also store structured lines.

use crate::error::{CoreError, CoreResult};

const ENTRY_SEPARATOR: &str = ", ";
const QUANTITY_SEPARATOR: &str = " x ";

/// Renders `(name, quantity)` pairs as `"Name x Qty, Name x Qty"`.
pub fn render_summary<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    lines
        .into_iter()
        .map(|(name, qty)| format!("{name}{QUANTITY_SEPARATOR}{qty}"))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Parses a summary back into `(name, quantity)` pairs.
///
/// An empty summary yields no entries. Any entry without `" x "` or with a
/// non-integer quantity fails with [`CoreError::MalformedLineItems`].
///
/// ## Example
/// ```rust
/// use shopkeep_core::line_items::parse_summary;
///
/// let lines = parse_summary("Shirt x 2, Box x Large x 1").unwrap();
/// assert_eq!(lines, vec![("Shirt".to_string(), 2), ("Box x Large".to_string(), 1)]);
/// assert!(parse_summary("Shirt").is_err());
/// ```
pub fn parse_summary(summary: &str) -> CoreResult<Vec<(String, i64)>> {
    if summary.trim().is_empty() {
        return Ok(Vec::new());
    }

    summary
        .split(ENTRY_SEPARATOR)
        .map(|entry| {
            let malformed = || CoreError::MalformedLineItems {
                entry: entry.to_string(),
            };

            let (name, qty) = entry.rsplit_once(QUANTITY_SEPARATOR).ok_or_else(malformed)?;
            let qty = qty.trim().parse::<i64>().map_err(|_| malformed())?;

            Ok((name.to_string(), qty))
        })
        .collect()
}
