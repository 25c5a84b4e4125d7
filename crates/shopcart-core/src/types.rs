//! # Domain Types
//!
//! Core domain types used throughout ShopCart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS (from the caller)           OUTPUTS (to the caller)             │
//! │  ┌─────────────────┐               ┌─────────────────┐                 │
//! │  │ ShopCandidate   │               │  PricedOrder    │                 │
//! │  │  shop_id        │──┐            │  shop_id        │                 │
//! │  │  location       │  │ pricing    │  distance_km    │──► OrderRecord  │
//! │  └─────────────────┘  ├──────────► │  delivery_charge│    (one per     │
//! │  ┌─────────────────┐  │            │  lines[]        │     line)       │
//! │  │ CartLineItem    │──┘            │  final_cost     │                 │
//! │  │  name, quantity │               └─────────────────┘                 │
//! │  │  unit_cost      │               ┌─────────────────┐                 │
//! │  └─────────────────┘               │  DeliveryQuote  │                 │
//! │                                    └─────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All of these are request-scoped values. Nothing here is cached or shared
//! between requests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::geo::GeoPoint;
use crate::money::{quantize_f64, Money};
use crate::DISTANCE_SCALE;

/// Shop identifier as stored by the marketplace.
pub type ShopId = i64;

/// Sentinel shop id meaning "no shop requested, pick the nearest".
pub const NO_SHOP: ShopId = 0;

// =============================================================================
// Shop Candidate
// =============================================================================

/// An active shop with known coordinates, eligible to fulfil orders.
///
/// Snapshot supplied by the caller. The core never mutates or persists it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopCandidate {
    pub shop_id: ShopId,
    pub location: GeoPoint,
}

impl ShopCandidate {
    #[inline]
    pub const fn new(shop_id: ShopId, latitude: f64, longitude: f64) -> Self {
        ShopCandidate {
            shop_id,
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// A single cart line as submitted at checkout.
///
/// `unit_cost` is a raw decimal: it is only rounded after being multiplied
/// by the quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
}

impl CartLineItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_cost: Decimal) -> Self {
        CartLineItem {
            name: name.into(),
            quantity,
            unit_cost,
        }
    }

    /// Unrounded `unit_cost × quantity`, `None` past the decimal range.
    #[inline]
    pub fn raw_cost(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(Decimal::from(self.quantity))
    }
}

// =============================================================================
// Priced Line
// =============================================================================

/// One priced cart line.
///
/// ## Note
/// `final_cost` is `cost + delivery_charge`: the delivery charge is added to
/// every line, not once per order. Callers summing `final_cost` across lines
/// therefore charge delivery N times for N lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedLine {
    #[serde(rename = "pickle_name")]
    pub name: String,
    pub quantity: u32,
    #[ts(type = "string")]
    pub cost: Money,
    #[ts(type = "string")]
    pub delivery_charge: Money,
    #[ts(type = "string")]
    pub final_cost: Money,
    pub shop_id: ShopId,
}

// =============================================================================
// Priced Order
// =============================================================================

/// The result of resolving a shop and pricing a cart at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedOrder {
    pub shop_id: ShopId,
    /// Kilometres, exactly 8 fractional digits.
    #[ts(type = "string")]
    pub distance_km: Decimal,
    #[ts(type = "string")]
    pub delivery_charge: Money,
    pub lines: Vec<PricedLine>,
    /// Sum of every line's `final_cost`.
    #[ts(type = "string")]
    pub final_cost: Money,
}

impl PricedOrder {
    /// Builds the per-line rows the caller persists for this checkout.
    ///
    /// All rows share one freshly generated `checkout_id`. Buyer coordinates
    /// are stored with 8 fractional digits, like the distance.
    ///
    /// ## Errors
    /// `CoreError::NonFiniteDistance` if the buyer coordinates cannot be
    /// represented as decimals (NaN, infinite).
    pub fn order_records(
        &self,
        user_id: i64,
        buyer: GeoPoint,
        placed_at: DateTime<Utc>,
    ) -> CoreResult<Vec<OrderRecord>> {
        let not_finite = || CoreError::NonFiniteDistance {
            from: buyer.to_string(),
            to: format!("shop {}", self.shop_id),
        };
        let latitude = quantize_f64(buyer.latitude, DISTANCE_SCALE).ok_or_else(not_finite)?;
        let longitude = quantize_f64(buyer.longitude, DISTANCE_SCALE).ok_or_else(not_finite)?;
        let checkout_id = Uuid::new_v4().to_string();

        Ok(self
            .lines
            .iter()
            .map(|line| OrderRecord {
                checkout_id: checkout_id.clone(),
                user_id,
                item_name: line.name.clone(),
                quantity: line.quantity,
                cost: line.cost,
                status: OrderStatus::Ordered,
                created_at: placed_at,
                latitude,
                longitude,
                distance_km: self.distance_km,
                delivery_charge: self.delivery_charge,
                final_cost: line.final_cost,
                shop_id: self.shop_id,
            })
            .collect())
    }
}

// =============================================================================
// Delivery Quote
// =============================================================================

/// A pre-checkout quote: delivery is charged once for the whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryQuote {
    pub shop_id: ShopId,
    #[ts(type = "string")]
    pub distance_km: Decimal,
    #[ts(type = "string")]
    pub delivery_charge: Money,
    /// Σ unit_cost × quantity, rounded once.
    #[ts(type = "string")]
    pub item_cost: Money,
    #[ts(type = "string")]
    pub final_cost: Money,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a persisted order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum OrderStatus {
    /// Placed by the buyer, not yet handled by the shop.
    #[default]
    Ordered,
}

// =============================================================================
// Order Record
// =============================================================================

/// A persistence-ready order row, one per priced cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRecord {
    /// UUID v4 shared by all rows of one checkout.
    pub checkout_id: String,
    pub user_id: i64,
    pub item_name: String,
    pub quantity: u32,
    #[ts(type = "string")]
    pub cost: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub latitude: Decimal,
    #[ts(type = "string")]
    pub longitude: Decimal,
    #[ts(type = "string")]
    pub distance_km: Decimal,
    #[ts(type = "string")]
    pub delivery_charge: Money,
    #[ts(type = "string")]
    pub final_cost: Money,
    pub shop_id: ShopId,
}

// =============================================================================
// Unit Tests
// =============================================================================
