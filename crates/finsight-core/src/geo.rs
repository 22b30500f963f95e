//! Location annotation for the spending map
//!
//! Maps free-text transaction locations to fixed coordinates and
//! categories to display colors. The tables are intentionally static;
//! unknown values fall back to city-center defaults.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionType};

/// Default coordinate for unknown locations (Chennai city center)
pub const DEFAULT_COORDS: (f64, f64) = (13.0827, 80.2707);

/// Fallback category color
pub const DEFAULT_COLOR: &str = "#9CA3AF";

/// Known place names with their coordinates as (lat, lng)
const LOCATION_COORDS: &[(&str, f64, f64)] = &[
    ("Mumbai", 19.0760, 72.8777),
    ("Delhi", 28.6139, 77.2090),
    ("Bangalore", 12.9716, 77.5946),
    ("Chennai", 13.0827, 80.2707),
    ("FORUM MALL CHENNAI", 13.0358, 80.2297),
    ("Phoenix Mall", 19.0896, 72.8656),
    ("Cafe Coffee Day", 13.0800, 80.2750),
    ("PVR Cinemas", 13.0450, 80.2400),
    ("BigBasket", 13.0900, 80.2800),
    ("HP Petrol Pump", 13.0750, 80.2650),
    ("Apollo Hospital", 13.0878, 80.2785),
    ("Zerodha", 13.0600, 80.2500),
    ("Online Payment", 13.0827, 80.2707),
    ("Current Location", 13.0827, 80.2707),
    ("Reliance Trends", 13.0400, 80.2350),
    ("Metro Station", 13.0820, 80.2720),
    ("Big Bazaar", 13.0380, 80.2320),
    ("Current City", 13.0827, 80.2707),
];

/// Display colors per category
const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Food & Dining", "#EF4444"),
    ("Transportation", "#06B6D4"),
    ("Shopping", "#EC4899"),
    ("Entertainment", "#8B5CF6"),
    ("Bills & Utilities", "#F59E0B"),
    ("Healthcare", "#10B981"),
    ("Investment", "#6366F1"),
    ("Travel", "#84CC16"),
    ("Others", "#9CA3AF"),
];

/// A transaction placed on the map
#[derive(Debug, Clone, Serialize)]
pub struct SpendingLocation {
    /// Transaction description doubles as the marker name
    pub name: String,
    pub location: String,
    pub total_amount: Decimal,
    pub transaction_count: u32,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: String,
    pub transaction_id: i64,
    pub mood: String,
    pub date: String,
}

/// Look up coordinates for a place name (exact match)
pub fn coordinates_for(location: &str) -> (f64, f64) {
    LOCATION_COORDS
        .iter()
        .find(|(name, _, _)| *name == location)
        .map(|(_, lat, lng)| (*lat, *lng))
        .unwrap_or(DEFAULT_COORDS)
}

/// Look up the display color for a category
pub fn color_for_category(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Annotate a user's top expenses with map coordinates
///
/// Picks the `limit` largest expenses (ties broken by lower id first) and
/// offsets each rank by `i*0.002 - 0.002` on both axes so markers sharing
/// a place still render as separate points.
pub fn top_spending_locations(transactions: &[Transaction], limit: usize) -> Vec<SpendingLocation> {
    let mut expenses: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.transaction_type == TransactionType::Expense)
        .collect();
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.id.cmp(&b.id)));

    expenses
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, tx)| {
            let (lat, lng) = coordinates_for(&tx.location);
            let offset = (i as f64) * 0.002 - 0.002;
            SpendingLocation {
                name: tx.description.clone(),
                location: tx.location.clone(),
                total_amount: tx.amount,
                transaction_count: 1,
                category: tx.category.clone(),
                latitude: lat + offset,
                longitude: lng + offset,
                color: color_for_category(&tx.category).to_string(),
                transaction_id: tx.id,
                mood: tx.mood.clone(),
                date: tx.transaction_date.to_rfc3339(),
            }
        })
        .collect()
}
