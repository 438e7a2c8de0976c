//! The cart value.
//!
//! A [`Cart`] is immutable. Every change returns a new `Cart` and leaves the
//! original untouched, so a subscriber holding an older value never sees it
//! change underneath it. Clones are cheap: the items sit behind an `Arc`.

use std::sync::Arc;

use go_marketplace_core::{CartItem, NewCartItem};

/// Ordered, id-unique collection of cart lines, in order of first addition.
///
/// Lookups use the first line with a matching id. A cart built by
/// [`Cart::from_items`] is taken as-is and may therefore hold duplicates if
/// the source did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Arc<Vec<CartItem>>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing lines without checking them.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct lines, including lines at quantity zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id.as_str() == id)
    }

    /// Cart with `item` added.
    ///
    /// An existing line for the same id gains one unit and keeps its other
    /// fields; otherwise a new line with quantity 1 is appended. Returns
    /// `None` only when the existing quantity cannot grow any further.
    #[must_use]
    pub fn with_added(&self, item: NewCartItem) -> Option<Self> {
        match self.position(item.id.as_str()) {
            Some(index) => self.with_quantity_change(index, |q| q.checked_add(1)),
            None => {
                let mut items = Vec::with_capacity(self.items.len() + 1);
                items.extend(self.items.iter().cloned());
                items.push(item.into_cart_item(1));
                Some(Self::from_items(items))
            }
        }
    }

    /// Cart with one more unit of `id`, or `None` if there is no such line.
    #[must_use]
    pub fn with_incremented(&self, id: &str) -> Option<Self> {
        let index = self.position(id)?;
        self.with_quantity_change(index, |q| q.checked_add(1))
    }

    /// Cart with one less unit of `id`.
    ///
    /// Returns `None` if there is no such line or it is already at zero. A
    /// line that drops to zero stays in the cart.
    #[must_use]
    pub fn with_decremented(&self, id: &str) -> Option<Self> {
        let index = self.position(id)?;
        self.with_quantity_change(index, |q| q.checked_sub(1))
    }

    fn with_quantity_change(
        &self,
        index: usize,
        change: impl FnOnce(u32) -> Option<u32>,
    ) -> Option<Self> {
        let current = self.items.get(index)?;
        let quantity = change(current.quantity)?;

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == index {
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();

        Some(Self::from_items(items))
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use go_marketplace_core::Price;

    use super::*;

    fn product(id: &str) -> NewCartItem {
        NewCartItem::new(id, "T", "u", Price::from_cents(1000))
    }

    fn cart_with(id: &str, quantity: u32) -> Cart {
        Cart::from_items(vec![product(id).into_cart_item(quantity)])
    }

    #[test]
    fn test_add_to_empty_cart_appends_with_quantity_one() {
        let cart = Cart::new().with_added(product("p1")).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0], product("p1").into_cart_item(1));
    }

    #[test]
    fn test_add_existing_bumps_quantity_without_duplicating() {
        let cart = Cart::new()
            .with_added(product("p1"))
            .unwrap()
            .with_added(product("p1"))
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_existing_keeps_original_fields() {
        let cart = cart_with("p1", 1);
        let renamed = NewCartItem::new("p1", "Other title", "other", Price::from_cents(1));

        let cart = cart.with_added(renamed).unwrap();
        let line = cart.get("p1").unwrap();

        assert_eq!(line.title, "T");
        assert_eq!(line.image_url, "u");
        assert_eq!(line.price, Price::from_cents(1000));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = Cart::new()
            .with_added(product("b"))
            .unwrap()
            .with_added(product("a"))
            .unwrap()
            .with_added(product("b"))
            .unwrap();

        let ids: Vec<&str> = cart.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_increment_existing() {
        let cart = cart_with("p1", 1).with_incremented("p1").unwrap();
        assert_eq!(cart.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_missing_is_none() {
        assert!(cart_with("p1", 1).with_incremented("missing").is_none());
    }

    #[test]
    fn test_decrement_to_zero_keeps_line() {
        let cart = cart_with("p1", 1).with_decremented("p1").unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").unwrap().quantity, 0);
    }

    #[test]
    fn test_decrement_at_zero_is_none() {
        assert!(cart_with("p1", 0).with_decremented("p1").is_none());
    }

    #[test]
    fn test_decrement_missing_is_none() {
        assert!(cart_with("p1", 3).with_decremented("missing").is_none());
    }

    #[test]
    fn test_increment_then_decrement_restores_quantity() {
        let original = cart_with("p1", 4);
        let restored = original
            .with_incremented("p1")
            .unwrap()
            .with_decremented("p1")
            .unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_increment_at_max_is_none() {
        assert!(cart_with("p1", u32::MAX).with_incremented("p1").is_none());
        assert!(cart_with("p1", u32::MAX).with_added(product("p1")).is_none());
    }

    #[test]
    fn test_changes_do_not_touch_previous_value() {
        let before = cart_with("p1", 1);
        let after = before.with_incremented("p1").unwrap();

        assert_eq!(before.get("p1").unwrap().quantity, 1);
        assert_eq!(after.get("p1").unwrap().quantity, 2);
    }

    #[test]
    fn test_duplicates_resolve_to_first_line() {
        let cart = Cart::from_items(vec![
            product("p1").into_cart_item(1),
            product("p1").into_cart_item(5),
        ]);

        let cart = cart.with_incremented("p1").unwrap();

        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].quantity, 5);
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = Cart::from_items(vec![
            product("a").into_cart_item(2),
            product("b").into_cart_item(0),
            product("c").into_cart_item(3),
        ]);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.len(), 3);
    }
}
