//! # Validation Module
//!
//! Turns loosely-typed request payloads into the typed values the pricing
//! engine works on.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Every field Option<_>: absent keys never fail parsing             │
//! │  └── Wrong JSON types fail here                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present (user_id, coordinates)                   │
//! │  ├── Coordinates finite                                                │
//! │  ├── Defaults applied (quantity 1, cost 0, shop "nearest")             │
//! │  └── Line items named, positive quantity, non-negative cost           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing (pricing.rs)                                         │
//! │  └── NoActiveShops / EmptyCart / InvalidLineItem                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopcart_core::validation::CheckoutRequest;
//!
//! let request: CheckoutRequest = serde_json::from_str(r#"{
//!     "user_id": 42,
//!     "latitude": 10.0,
//!     "longitude": 20.0,
//!     "items": [{ "pickle_name": "mango", "quantity": 3, "cost": "15.00" }]
//! }"#).unwrap();
//!
//! let checkout = request.validate_checkout().unwrap();
//! assert_eq!(checkout.user_id, 42);
//! assert_eq!(checkout.requested_shop, None);
//! assert_eq!(checkout.items[0].quantity, 3);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::geo::GeoPoint;
use crate::types::{CartLineItem, ShopId, NO_SHOP};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Payloads
// =============================================================================

/// A cart line as sent by the storefront.
///
/// Field names match the storefront's JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub pickle_name: Option<String>,
    pub quantity: Option<i64>,
    pub cost: Option<Decimal>,
    pub shop_id: Option<ShopId>,
}

/// Body of a checkout or quote request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Absent or `0` means "nearest shop".
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

/// A checkout request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCheckout {
    pub user_id: i64,
    pub buyer: GeoPoint,
    pub requested_shop: Option<ShopId>,
    pub items: Vec<CartLineItem>,
}

/// A quote request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuote {
    pub buyer: GeoPoint,
    pub requested_shop: Option<ShopId>,
    pub items: Vec<CartLineItem>,
}

impl CheckoutRequest {
    /// Validates a checkout (order placement) request.
    ///
    /// ## Errors
    /// - `Validation(Required)` for a missing `user_id`, `latitude` or `longitude`
    /// - `Validation(NotFinite)` for NaN/infinite coordinates
    /// - `EmptyCart` when `items` is empty
    /// - `InvalidLineItem` for an unnamed line, a non-positive quantity, or a
    ///   negative cost
    pub fn validate_checkout(&self) -> CoreResult<ValidatedCheckout> {
        let user_id = self.user_id.ok_or_else(|| required("user_id"))?;
        let buyer = self.buyer()?;
        let items = self.line_items(true)?;

        Ok(ValidatedCheckout {
            user_id,
            buyer,
            requested_shop: self.requested_shop(),
            items,
        })
    }

    /// Validates a quote request. No user is needed and line names are
    /// optional.
    pub fn validate_quote(&self) -> CoreResult<ValidatedQuote> {
        let buyer = self.buyer()?;
        let items = self.line_items(false)?;

        Ok(ValidatedQuote {
            buyer,
            requested_shop: self.requested_shop(),
            items,
        })
    }

    fn buyer(&self) -> ValidationResult<GeoPoint> {
        let latitude = self.latitude.ok_or_else(|| required("latitude"))?;
        let longitude = self.longitude.ok_or_else(|| required("longitude"))?;
        GeoPoint::try_new(latitude, longitude)
    }

    fn requested_shop(&self) -> Option<ShopId> {
        self.shop_id.filter(|id| *id != NO_SHOP)
    }

    fn line_items(&self, names_required: bool) -> CoreResult<Vec<CartLineItem>> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| validate_item(index, item, names_required))
            .collect()
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates a single cart line, applying the storefront defaults
/// (quantity 1, cost 0).
pub fn validate_item(
    index: usize,
    item: &ItemPayload,
    name_required: bool,
) -> CoreResult<CartLineItem> {
    let invalid = |reason: &str| CoreError::InvalidLineItem {
        index,
        reason: reason.to_string(),
    };

    let name = item
        .pickle_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if name_required && name.is_empty() {
        return Err(invalid("pickle_name missing"));
    }

    let quantity = validate_quantity(item.quantity.unwrap_or(1))
        .map_err(|e| invalid(&e.to_string()))?;

    let unit_cost = item.cost.unwrap_or(Decimal::ZERO);
    validate_unit_cost(unit_cost).map_err(|e| invalid(&e.to_string()))?;

    Ok(CartLineItem::new(name, quantity, unit_cost))
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit in `u32`
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(qty).map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("{qty} is too large"),
    })
}

/// Validates a unit cost. Zero is allowed (free items).
pub fn validate_unit_cost(cost: Decimal) -> ValidationResult<()> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: "cost".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
