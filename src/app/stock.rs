use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::Movement;

/// Net stock per product.
pub fn summarize_stock(movements: &[Movement]) -> BTreeMap<Uuid, f64> {
    let mut totals = BTreeMap::new();
    for movement in movements {
        *totals.entry(movement.product_id).or_insert(0.0) += movement.signed_quantity();
    }
    totals
}
