//! # Cart
//!
//! A buyer's saved cart, built up before checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront Action        Operation              Cart Change            │
//! │  ─────────────────        ─────────              ───────────            │
//! │                                                                         │
//! │  Add to cart ───────────► add_items() ─────────► one row per item      │
//! │                           (bad items skipped)                           │
//! │                                                                         │
//! │  Remove ────────────────► remove() ────────────► drop rows by name    │
//! │                                                                         │
//! │  Buy now ───────────────► lines() ─────────────► Vec<CartLineItem>     │
//! │                                                  (to pricing)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLineItem, ShopId};
use crate::validation::ItemPayload;

/// An item saved in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub pickle_name: String,
    pub quantity: u32,
    /// Unit cost as listed when the item was added.
    pub cost: Decimal,
    pub shop_id: ShopId,
    pub added_at: DateTime<Utc>,
}

/// The shopping cart.
///
/// ## Invariants
/// - Every accepted item is its own row, so adding the same pickle twice
///   leaves two rows
/// - Quantity and cost of every entry are positive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds items to the cart, silently skipping any that lack a name, a
    /// positive quantity, a positive cost or a shop id.
    ///
    /// ## Returns
    /// The number of payload items accepted.
    pub fn add_items(&mut self, payloads: &[ItemPayload]) -> usize {
        let mut accepted = 0;

        for payload in payloads {
            let Some(entry) = Self::entry_from(payload) else {
                debug!(?payload, "Skipping invalid cart item");
                continue;
            };

            self.items.push(entry);
            accepted += 1;
        }

        accepted
    }

    fn entry_from(payload: &ItemPayload) -> Option<CartEntry> {
        let name = payload.pickle_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let quantity = u32::try_from(payload.quantity?).ok().filter(|q| *q > 0)?;
        let cost = payload.cost.filter(|c| c.is_sign_positive() && !c.is_zero())?;
        let shop_id = payload.shop_id?;

        Some(CartEntry {
            pickle_name: name.to_string(),
            quantity,
            cost,
            shop_id,
            added_at: Utc::now(),
        })
    }

    /// Removes every entry with the given name.
    pub fn remove(&mut self, pickle_name: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|e| e.pickle_name != pickle_name);

        if self.items.len() == initial_len {
            Err(CoreError::CartItemNotFound(pickle_name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Σ cost × quantity, rounded once.
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, e| {
                e.cost
                    .checked_mul(Decimal::from(e.quantity))
                    .and_then(|cost| total.checked_add(cost))
            })
            .and_then(Money::checked_new)
            .ok_or_else(|| CoreError::AmountOverflow("cart subtotal".to_string()))
    }

    /// The cart as checkout lines.
    pub fn lines(&self) -> Vec<CartLineItem> {
        self.items
            .iter()
            .map(|e| CartLineItem::new(e.pickle_name.clone(), e.quantity, e.cost))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload(name: &str, qty: i64, cost: Decimal, shop: ShopId) -> ItemPayload {
        ItemPayload {
            pickle_name: Some(name.to_string()),
            quantity: Some(qty),
            cost: Some(cost),
            shop_id: Some(shop),
        }
    }

    #[test]
    fn test_add_items() {
        let mut cart = Cart::new();
        let accepted = cart.add_items(&[payload("mango", 2, dec!(9.99), 1)]);

        assert_eq!(accepted, 1);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().unwrap().to_string(), "19.98");
    }

    #[test]
    fn test_add_same_item_twice_keeps_both_rows() {
        let mut cart = Cart::new();
        cart.add_items(&[payload("mango", 2, dec!(9.99), 1)]);
        cart.add_items(&[payload("mango", 3, dec!(9.99), 1)]);
        cart.add_items(&[payload("mango", 1, dec!(9.99), 2)]);

        assert_eq!(cart.items.len(), 3);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_quantity(), 6);

        // remove drops every row with the name
        cart.remove("mango").unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_past_decimal_range() {
        let mut cart = Cart::new();
        cart.add_items(&[payload("mango", 2, Decimal::MAX, 1)]);

        assert!(matches!(
            cart.subtotal(),
            Err(CoreError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_invalid_items_are_skipped() {
        let mut cart = Cart::new();
        let mut no_shop = payload("lemon", 1, dec!(5), 1);
        no_shop.shop_id = None;

        let accepted = cart.add_items(&[
            payload("mango", 1, dec!(10), 1),
            payload("", 1, dec!(10), 1),
            payload("chilli", 0, dec!(10), 1),
            payload("garlic", 1, dec!(0), 1),
            no_shop,
            ItemPayload::default(),
        ]);

        assert_eq!(accepted, 1);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].pickle_name, "mango");
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add_items(&[payload("mango", 1, dec!(10), 1), payload("lemon", 1, dec!(5), 1)]);

        cart.remove("mango").unwrap();
        assert_eq!(cart.items.len(), 1);

        assert!(matches!(
            cart.remove("mango"),
            Err(CoreError::CartItemNotFound(_))
        ));
    }

    #[test]
    fn test_lines_and_clear() {
        let mut cart = Cart::new();
        cart.add_items(&[payload("mango", 3, dec!(15), 1)]);

        assert_eq!(cart.lines(), vec![CartLineItem::new("mango", 3, dec!(15))]);

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.lines().is_empty());
    }
}
