//! # Pricing Module
//!
//! Shop resolution and delivery pricing.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    resolve_and_price                                    │
//! │                                                                         │
//! │  candidates empty? ──► NoActiveShops                                   │
//! │  cart empty?       ──► EmptyCart                                       │
//! │  line unnamed?     ──► InvalidLineItem                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  resolve_shop                                                           │
//! │  ├── requested absent / 0  ──► nearest (first wins on ties)            │
//! │  ├── requested matches     ──► that shop, however far                  │
//! │  └── requested unmatched   ──► nearest                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  distance_km      = round_half_up(haversine, 8)                        │
//! │  delivery_charge  = max(20.00, round_half_up(distance_km × 10, 2))     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  per line: cost       = round_half_up(unit_cost × qty, 2)              │
//! │            final_cost = round_half_up(cost + delivery_charge, 2)       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PricedOrder { final_cost = Σ line final_cost }                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its arguments. Every product and
//! sum is checked; an amount past the decimal range is `AmountOverflow`.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::geo::GeoPoint;
use crate::money::{quantize_f64, Money};
use crate::types::{
    CartLineItem, DeliveryQuote, PricedLine, PricedOrder, ShopCandidate, ShopId, NO_SHOP,
};
use crate::{DELIVERY_RATE_PER_KM, DISTANCE_SCALE, MIN_DELIVERY_CHARGE};

// =============================================================================
// Shop Resolution
// =============================================================================

/// Returns the candidate closest to `buyer`.
///
/// Ties go to the earliest candidate in iteration order.
pub fn nearest_shop<'a>(
    buyer: &GeoPoint,
    candidates: &'a [ShopCandidate],
) -> CoreResult<&'a ShopCandidate> {
    candidates
        .iter()
        .map(|shop| (shop, buyer.distance_km(&shop.location)))
        // min_by keeps the first of several equal minima
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(shop, _)| shop)
        .ok_or(CoreError::NoActiveShops)
}

/// Picks the shop that fulfils an order.
///
/// ## Rules (order matters)
/// 1. `requested` absent or `0`: nearest candidate.
/// 2. `requested` matches a candidate: that candidate, even if another one
///    is closer.
/// 3. `requested` matches nothing: nearest candidate. Not an error.
///
/// ## Example
/// ```rust
/// use shopcart_core::geo::GeoPoint;
/// use shopcart_core::pricing::resolve_shop;
/// use shopcart_core::ShopCandidate;
///
/// let shops = [
///     ShopCandidate::new(1, 10.0, 20.0),
///     ShopCandidate::new(2, 10.001, 20.001),
/// ];
/// let buyer = GeoPoint::new(10.0, 20.0);
///
/// assert_eq!(resolve_shop(&buyer, None, &shops).unwrap().shop_id, 1);
/// assert_eq!(resolve_shop(&buyer, Some(2), &shops).unwrap().shop_id, 2);
/// assert_eq!(resolve_shop(&buyer, Some(99), &shops).unwrap().shop_id, 1);
/// ```
pub fn resolve_shop<'a>(
    buyer: &GeoPoint,
    requested: Option<ShopId>,
    candidates: &'a [ShopCandidate],
) -> CoreResult<&'a ShopCandidate> {
    if candidates.is_empty() {
        return Err(CoreError::NoActiveShops);
    }

    match requested.filter(|id| *id != NO_SHOP) {
        None => nearest_shop(buyer, candidates),
        Some(id) => match candidates.iter().find(|shop| shop.shop_id == id) {
            Some(shop) => Ok(shop),
            None => {
                let nearest = nearest_shop(buyer, candidates)?;
                debug!(
                    requested = id,
                    chosen = nearest.shop_id,
                    "Requested shop is not active, falling back to nearest"
                );
                Ok(nearest)
            }
        },
    }
}

/// Haversine distance from `buyer` to `shop`, rounded half-up to 8
/// fractional digits.
pub fn distance_to_shop(buyer: &GeoPoint, shop: &ShopCandidate) -> CoreResult<Decimal> {
    quantize_f64(buyer.distance_km(&shop.location), DISTANCE_SCALE).ok_or_else(|| {
        CoreError::NonFiniteDistance {
            from: buyer.to_string(),
            to: shop.location.to_string(),
        }
    })
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Delivery tariff: a per-kilometre rate with a minimum charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Floor applied after rounding the distance-proportional charge.
    pub min_charge: Money,
    /// Charge per kilometre, in the same currency unit as cart costs.
    pub rate_per_km: Decimal,
}

impl Default for PricingPolicy {
    /// 20.00 minimum, 10 per km.
    fn default() -> Self {
        PricingPolicy {
            min_charge: Money::from_major(MIN_DELIVERY_CHARGE),
            rate_per_km: Decimal::from(DELIVERY_RATE_PER_KM),
        }
    }
}

impl PricingPolicy {
    pub fn new(min_charge: Money, rate_per_km: Decimal) -> Self {
        PricingPolicy {
            min_charge,
            rate_per_km,
        }
    }

    /// Delivery charge for an already-rounded distance.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use shopcart_core::pricing::PricingPolicy;
    ///
    /// let policy = PricingPolicy::default();
    /// // 0.5 km → 5.00, below the floor
    /// assert_eq!(policy.delivery_charge(Decimal::new(5, 1)).unwrap().to_string(), "20.00");
    /// // 3.456789 km → 34.57
    /// assert_eq!(policy.delivery_charge(Decimal::new(3456789, 6)).unwrap().to_string(), "34.57");
    /// ```
    pub fn delivery_charge(&self, distance_km: Decimal) -> CoreResult<Money> {
        let proportional = distance_km
            .checked_mul(self.rate_per_km)
            .and_then(Money::checked_new)
            .ok_or_else(|| overflow("delivery charge"))?;
        Ok(proportional.max(self.min_charge))
    }

    /// Resolves the fulfilling shop and prices every cart line.
    ///
    /// ## Errors
    /// - `NoActiveShops` when `candidates` is empty
    /// - `EmptyCart` when `cart` is empty
    /// - `InvalidLineItem` when a line has no name or a zero quantity
    /// - `AmountOverflow` when a charge, line or total leaves the decimal range
    pub fn resolve_and_price(
        &self,
        buyer: &GeoPoint,
        requested: Option<ShopId>,
        candidates: &[ShopCandidate],
        cart: &[CartLineItem],
    ) -> CoreResult<PricedOrder> {
        if candidates.is_empty() {
            return Err(CoreError::NoActiveShops);
        }
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_lines(cart)?;

        let shop = resolve_shop(buyer, requested, candidates)?;
        let distance_km = distance_to_shop(buyer, shop)?;
        let delivery_charge = self.delivery_charge(distance_km)?;

        let lines = cart
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let cost = Money::line_cost(item.unit_cost, item.quantity)
                    .ok_or_else(|| overflow(format!("cost of line {index}")))?;
                let final_cost = cost
                    .checked_add(delivery_charge)
                    .ok_or_else(|| overflow(format!("final cost of line {index}")))?;
                Ok(PricedLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    cost,
                    delivery_charge,
                    final_cost,
                    shop_id: shop.shop_id,
                })
            })
            .collect::<CoreResult<Vec<PricedLine>>>()?;
        let final_cost = lines
            .iter()
            .try_fold(Money::zero(), |total, line| total.checked_add(line.final_cost))
            .ok_or_else(|| overflow("order total"))?;

        debug!(
            shop_id = shop.shop_id,
            %distance_km,
            %delivery_charge,
            lines = lines.len(),
            %final_cost,
            "Priced checkout"
        );

        Ok(PricedOrder {
            shop_id: shop.shop_id,
            distance_km,
            delivery_charge,
            lines,
            final_cost,
        })
    }

    /// Quotes a cart with the delivery charge applied once.
    ///
    /// Item costs are summed unrounded, then the delivery charge is added
    /// and the total rounded. Line names are not required.
    ///
    /// ## Errors
    /// - `NoActiveShops` when `candidates` is empty
    /// - `EmptyCart` when `cart` is empty
    /// - `AmountOverflow` when the charge or a total leaves the decimal range
    pub fn quote_delivery(
        &self,
        buyer: &GeoPoint,
        requested: Option<ShopId>,
        candidates: &[ShopCandidate],
        cart: &[CartLineItem],
    ) -> CoreResult<DeliveryQuote> {
        if candidates.is_empty() {
            return Err(CoreError::NoActiveShops);
        }
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let shop = resolve_shop(buyer, requested, candidates)?;
        let distance_km = distance_to_shop(buyer, shop)?;
        let delivery_charge = self.delivery_charge(distance_km)?;

        let raw_items = cart
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                item.raw_cost().and_then(|cost| total.checked_add(cost))
            })
            .ok_or_else(|| overflow("item total"))?;
        let item_cost = Money::checked_new(raw_items).ok_or_else(|| overflow("item total"))?;
        let final_cost = raw_items
            .checked_add(delivery_charge.amount())
            .and_then(Money::checked_new)
            .ok_or_else(|| overflow("quote total"))?;

        debug!(
            shop_id = shop.shop_id,
            %distance_km,
            %delivery_charge,
            %final_cost,
            "Quoted delivery"
        );

        Ok(DeliveryQuote {
            shop_id: shop.shop_id,
            distance_km,
            delivery_charge,
            item_cost,
            final_cost,
        })
    }
}

fn overflow(what: impl Into<String>) -> CoreError {
    CoreError::AmountOverflow(what.into())
}

fn validate_lines(cart: &[CartLineItem]) -> CoreResult<()> {
    for (index, item) in cart.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(CoreError::InvalidLineItem {
                index,
                reason: "pickle_name missing".to_string(),
            });
        }
        if item.quantity == 0 {
            return Err(CoreError::InvalidLineItem {
                index,
                reason: "quantity must be positive".to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Convenience Functions (default tariff)
// =============================================================================

/// [`PricingPolicy::resolve_and_price`] with the default tariff.
pub fn resolve_and_price(
    buyer: &GeoPoint,
    requested: Option<ShopId>,
    candidates: &[ShopCandidate],
    cart: &[CartLineItem],
) -> CoreResult<PricedOrder> {
    PricingPolicy::default().resolve_and_price(buyer, requested, candidates, cart)
}

/// [`PricingPolicy::quote_delivery`] with the default tariff.
pub fn quote_delivery(
    buyer: &GeoPoint,
    requested: Option<ShopId>,
    candidates: &[ShopCandidate],
    cart: &[CartLineItem],
) -> CoreResult<DeliveryQuote> {
    PricingPolicy::default().quote_delivery(buyer, requested, candidates, cart)
}

// =============================================================================
// Unit Tests
// =============================================================================
