//! # shopcart-core: Pure Business Logic for ShopCart
//!
//! This crate picks the shop that fulfils a marketplace order and prices
//! its delivery. It contains pure functions only, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ShopCart Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Caller (quote-cli, or a web handler)               │   │
//! │  │   load active shops ──► parse request ──► persist order rows    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopcart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │   geo   │ │  money  │ │ pricing │ │validation│ │  cart  │  │   │
//! │  │   │haversine│ │ Decimal │ │ resolve │ │ requests │ │ saved  │  │   │
//! │  │   │GeoPoint │ │half-up  │ │ & price │ │ defaults │ │ items  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`geo`] - `GeoPoint` and haversine distance
//! - [`money`] - `Money` and round-half-up helpers
//! - [`types`] - Shop candidates, cart lines, priced orders, order records
//! - [`pricing`] - Shop resolution and delivery pricing
//! - [`validation`] - Request payloads and boundary validation
//! - [`cart`] - Saved cart aggregate
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use shopcart_core::{resolve_and_price, CartLineItem, GeoPoint, ShopCandidate};
//!
//! let shops = [ShopCandidate::new(1, 10.0, 20.0), ShopCandidate::new(2, 10.001, 20.001)];
//! let cart = [CartLineItem::new("pickle", 3, Decimal::new(1500, 2))];
//!
//! let order = resolve_and_price(&GeoPoint::new(10.0, 20.0), None, &shops, &cart).unwrap();
//! assert_eq!(order.shop_id, 1);
//! assert_eq!(order.delivery_charge.to_string(), "20.00"); // minimum charge
//! assert_eq!(order.lines[0].final_cost.to_string(), "65.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod geo;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry};
pub use error::{CoreError, CoreResult, ValidationError};
pub use geo::{haversine_km, GeoPoint};
pub use money::Money;
pub use pricing::{quote_delivery, resolve_and_price, resolve_shop, PricingPolicy};
pub use types::*;
pub use validation::{CheckoutRequest, ItemPayload, ValidatedCheckout, ValidatedQuote};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum delivery charge, in whole currency units.
///
/// Applied after the distance-proportional charge is rounded, so a buyer
/// next door still pays this much.
pub const MIN_DELIVERY_CHARGE: i64 = 20;

/// Delivery charge per kilometre, in whole currency units.
pub const DELIVERY_RATE_PER_KM: i64 = 10;

/// Fractional digits carried by distances and stored coordinates.
pub const DISTANCE_SCALE: u32 = 8;
