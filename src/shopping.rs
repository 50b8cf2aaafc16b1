//! Shopping list reduction over the ingredient rows of a user's cart.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One ingredient row of one recipe in the cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Sum amounts per `(name, measurement_unit)`; output is sorted by name, then unit.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += i64::from(line.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

pub fn render_text(items: &[ShoppingListItem]) -> String {
    let mut out = String::from("Shopping list\n\n");
    if items.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }
    for (idx, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({}) - {}",
            idx + 1,
            item.name,
            item.measurement_unit,
            item.total_amount
        );
    }
    out
}
