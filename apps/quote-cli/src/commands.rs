//! # Commands
//!
//! One function per CLI subcommand. Each takes already-loaded inputs and
//! returns the response body, so the file handling in `main` stays thin.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  distance ──► haversine ──────────────────────────► DistanceResponse   │
//! │                                                                         │
//! │  quote    ──► validate_quote ──► quote_delivery ──► QuoteResponse      │
//! │                                                                         │
//! │  checkout ──► validate_checkout ──► resolve_and_price                  │
//! │                  └──► order_records ──────────────► CheckoutResponse   │
//! │                                                                         │
//! │  cart     ──► add_items ──► remove ──► subtotal ──► CartResponse       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shopcart_core::money::quantize_f64;
use shopcart_core::{
    Cart, CartEntry, CheckoutRequest, CoreError, DeliveryQuote, GeoPoint, Money, OrderRecord,
    PricedLine, PricingPolicy, ShopId, DISTANCE_SCALE,
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::shops::{active_candidates, ShopRow};

// =============================================================================
// Responses
// =============================================================================

/// Body of the `distance` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub success: bool,
    pub distance_km: Decimal,
}

/// Body of the `quote` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(flatten)]
    pub quote: DeliveryQuote,
}

/// Body of the `checkout` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub shop_id: ShopId,
    pub distance_km: Decimal,
    pub delivery_charge: Money,
    pub orders: Vec<PricedLine>,
    pub final_cost: Money,
    /// Rows for the caller to persist, one per order line.
    pub records: Vec<OrderRecord>,
}

/// Body of the `cart` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub success: bool,
    /// Items added; invalid ones are skipped, not reported as errors.
    pub accepted: usize,
    pub skipped: usize,
    pub items: Vec<CartEntry>,
    pub total_quantity: u64,
    pub subtotal: Money,
}

// =============================================================================
// Input Loading
// =============================================================================

/// Reads and parses a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ApiError::invalid_input(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::invalid_input(format!("{}: {e}", path.display())))
}

// =============================================================================
// Commands
// =============================================================================

/// Great-circle distance between two points, 8 fractional digits.
pub fn distance(from: &GeoPoint, to: &GeoPoint) -> Result<DistanceResponse, ApiError> {
    let distance_km = quantize_f64(from.distance_km(to), DISTANCE_SCALE).ok_or_else(|| {
        ApiError::from(CoreError::NonFiniteDistance {
            from: from.to_string(),
            to: to.to_string(),
        })
    })?;
    Ok(DistanceResponse {
        success: true,
        distance_km,
    })
}

/// Quotes a cart, delivery charged once.
pub fn quote(
    policy: &PricingPolicy,
    shops: &[ShopRow],
    request: &CheckoutRequest,
) -> Result<QuoteResponse, ApiError> {
    let validated = request.validate_quote()?;
    let candidates = active_candidates(shops);

    let quote = policy.quote_delivery(
        &validated.buyer,
        validated.requested_shop,
        &candidates,
        &validated.items,
    )?;
    info!(
        shop_id = quote.shop_id,
        final_cost = %quote.final_cost,
        "Quote computed"
    );

    Ok(QuoteResponse {
        success: true,
        quote,
    })
}

/// Prices a checkout and derives the order rows to persist.
pub fn checkout(
    policy: &PricingPolicy,
    shops: &[ShopRow],
    request: &CheckoutRequest,
    placed_at: DateTime<Utc>,
) -> Result<CheckoutResponse, ApiError> {
    let validated = request.validate_checkout()?;
    let candidates = active_candidates(shops);

    let order = policy.resolve_and_price(
        &validated.buyer,
        validated.requested_shop,
        &candidates,
        &validated.items,
    )?;
    let records = order.order_records(validated.user_id, validated.buyer, placed_at)?;
    debug!(records = records.len(), "Built order records");
    info!(
        user_id = validated.user_id,
        shop_id = order.shop_id,
        final_cost = %order.final_cost,
        "Order placed"
    );

    Ok(CheckoutResponse {
        success: true,
        message: "Order placed successfully".to_string(),
        shop_id: order.shop_id,
        distance_km: order.distance_km,
        delivery_charge: order.delivery_charge,
        orders: order.lines,
        final_cost: order.final_cost,
        records,
    })
}

/// Builds a saved cart from the request's items, then drops the named ones.
pub fn cart(request: &CheckoutRequest, remove: &[String]) -> Result<CartResponse, ApiError> {
    let mut cart = Cart::new();
    let accepted = cart.add_items(&request.items);
    for name in remove {
        cart.remove(name)?;
    }
    let subtotal = cart.subtotal()?;

    let skipped = request.items.len() - accepted;
    info!(accepted, skipped, removed = remove.len(), "Cart built");

    Ok(CartResponse {
        success: true,
        accepted,
        skipped,
        total_quantity: cart.total_quantity(),
        items: cart.items,
        subtotal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;

    fn shops() -> Vec<ShopRow> {
        serde_json::from_str(
            r#"[
                {"shop_id": 1, "latitude": 10.0, "longitude": 20.0, "status": "active"},
                {"shop_id": 2, "latitude": 10.001, "longitude": 20.001, "status": "active"},
                {"shop_id": 3, "latitude": 10.0, "longitude": 20.0, "status": "closed"}
            ]"#,
        )
        .unwrap()
    }

    fn request(json: &str) -> CheckoutRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_distance() {
        let response = distance(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 0.0)).unwrap();
        assert_eq!(response.distance_km.scale(), 8);
        assert!(response.distance_km > dec!(111.19) && response.distance_km < dec!(111.20));
    }

    #[test]
    fn test_checkout() {
        let req = request(
            r#"{"user_id": 9, "latitude": 10.0, "longitude": 20.0,
                "items": [{"pickle_name": "pickle", "quantity": 3, "cost": "15.00"}]}"#,
        );
        let response = checkout(&PricingPolicy::default(), &shops(), &req, Utc::now()).unwrap();

        assert!(response.success);
        assert_eq!(response.shop_id, 1);
        assert_eq!(response.delivery_charge.to_string(), "20.00");
        assert_eq!(response.orders[0].cost.to_string(), "45.00");
        assert_eq!(response.orders[0].final_cost.to_string(), "65.00");
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0].user_id, 9);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["final_cost"], "65.00");
        assert_eq!(json["orders"][0]["pickle_name"], "pickle");
    }

    #[test]
    fn test_checkout_requested_shop() {
        let req = request(
            r#"{"user_id": 9, "latitude": 10.0, "longitude": 20.0, "shop_id": 2,
                "items": [{"pickle_name": "pickle"}]}"#,
        );
        let response = checkout(&PricingPolicy::default(), &shops(), &req, Utc::now()).unwrap();
        assert_eq!(response.shop_id, 2);
    }

    #[test]
    fn test_inactive_shop_is_not_a_candidate() {
        let req = request(
            r#"{"latitude": 10.0, "longitude": 20.0, "shop_id": 3,
                "items": [{"cost": "10"}]}"#,
        );
        let response = quote(&PricingPolicy::default(), &shops(), &req).unwrap();
        assert_eq!(response.quote.shop_id, 1);
    }

    #[test]
    fn test_quote() {
        let req = request(
            r#"{"latitude": 10.0, "longitude": 20.0,
                "items": [{"quantity": 2, "cost": "50"}, {"quantity": 1, "cost": "100"}]}"#,
        );
        let response = quote(&PricingPolicy::default(), &shops(), &req).unwrap();
        assert_eq!(response.quote.final_cost.to_string(), "220.00");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["shop_id"], 1);
        assert_eq!(json["delivery_charge"], "20.00");
    }

    #[test]
    fn test_no_active_shops() {
        let req = request(
            r#"{"user_id": 1, "latitude": 10.0, "longitude": 20.0,
                "items": [{"pickle_name": "pickle"}]}"#,
        );
        let err = checkout(&PricingPolicy::default(), &[], &req, Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_missing_user_id() {
        let req = request(
            r#"{"latitude": 10.0, "longitude": 20.0, "items": [{"pickle_name": "pickle"}]}"#,
        );
        let err = checkout(&PricingPolicy::default(), &shops(), &req, Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = load_json::<Vec<ShopRow>>(Path::new("/nonexistent/shops.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_oversized_cost_is_an_error_envelope() {
        let req = request(
            r#"{"user_id": 9, "latitude": 10.0, "longitude": 20.0,
                "items": [{"pickle_name": "p", "quantity": 2,
                           "cost": "79228162514264337593543950335"}]}"#,
        );
        let err = checkout(&PricingPolicy::default(), &shops(), &req, Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.success);

        let err = quote(&PricingPolicy::default(), &shops(), &req).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_cart() {
        let req = request(
            r#"{"items": [
                {"pickle_name": "mango", "quantity": 2, "cost": "9.99", "shop_id": 1},
                {"pickle_name": "mango", "quantity": 1, "cost": "9.99", "shop_id": 1},
                {"pickle_name": "lemon", "quantity": 1, "cost": "5", "shop_id": 2},
                {"pickle_name": "garlic", "quantity": 1}
            ]}"#,
        );
        let response = cart(&req, &["lemon".to_string()]).unwrap();

        assert_eq!(response.accepted, 3);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.total_quantity, 3);
        assert_eq!(response.subtotal.to_string(), "29.97");
    }

    #[test]
    fn test_cart_remove_missing_item() {
        let req = request(r#"{"items": [{"pickle_name": "mango", "quantity": 1, "cost": "5", "shop_id": 1}]}"#);
        let err = cart(&req, &["lemon".to_string()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
