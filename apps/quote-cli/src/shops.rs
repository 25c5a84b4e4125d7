//! Shop rows as exported from the marketplace's shop table.
//!
//! Only active shops with both coordinates become pricing candidates.

use serde::{Deserialize, Serialize};
use shopcart_core::{GeoPoint, ShopCandidate, ShopId};
use tracing::debug;

/// Status value of shops that can take orders.
pub const ACTIVE_STATUS: &str = "active";

/// One shop row. Only an explicit `active` status takes orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRow {
    pub shop_id: ShopId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ShopRow {
    fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(ACTIVE_STATUS))
    }

    fn candidate(&self) -> Option<ShopCandidate> {
        if !self.is_active() {
            return None;
        }
        let location = GeoPoint::try_new(self.latitude?, self.longitude?).ok()?;
        Some(ShopCandidate {
            shop_id: self.shop_id,
            location,
        })
    }
}

/// Filters rows down to pricing candidates, preserving row order.
pub fn active_candidates(rows: &[ShopRow]) -> Vec<ShopCandidate> {
    let candidates: Vec<ShopCandidate> = rows.iter().filter_map(ShopRow::candidate).collect();
    debug!(
        rows = rows.len(),
        candidates = candidates.len(),
        "Filtered active shops"
    );
    candidates
}
