//! Cart and line-item types.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s holding at most one entry per
//! product. The transition methods never mutate in place: each returns the
//! next cart so callers can validate and persist it before committing.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A product entry in the cart with its requested quantity.
///
/// Product fields are copied from the catalog when the item is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    #[serde(alias = "name")]
    pub title: String,
    pub price: Price,
    pub image: String,
    pub amount: u32,
}

impl LineItem {
    /// Create a line-item from a catalog product.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Price of this line (unit price times amount).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// An ordered list of line-items, unique by product ID.
///
/// Serializes as a bare JSON array. Deserializing goes through
/// `From<Vec<LineItem>>`, so duplicate IDs are merged and empty lines dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line-items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line-items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Look up the line-item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart holds a line-item for this product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line-items.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// The cart with one more unit of `id`, or `None` if `id` is not in the
    /// cart or its amount is already `u32::MAX`.
    #[must_use]
    pub fn incremented(&self, id: ProductId) -> Option<Self> {
        let current = self.get(id)?.amount;
        self.with_amount(id, current.checked_add(1)?)
    }

    /// The cart with `item` appended, or `None` if its product is already present.
    #[must_use]
    pub fn appended(&self, item: LineItem) -> Option<Self> {
        if self.contains(item.id) || item.amount == 0 {
            return None;
        }
        let mut items = self.items.clone();
        items.push(item);
        Some(Self { items })
    }

    /// The cart without `id`, or `None` if `id` is not in the cart.
    #[must_use]
    pub fn removed(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// The cart with `id` set to exactly `amount` units.
    ///
    /// Returns `None` if `id` is not in the cart or `amount` is zero.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    LineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(raw: Vec<LineItem>) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(raw.len());
        for item in raw {
            if item.amount == 0 {
                continue;
            }
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.amount = existing.amount.saturating_add(item.amount),
                None => items.push(item),
            }
        }
        Self { items }
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, amount: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: "100".parse().unwrap(),
            image: format!("https://example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_incremented_touches_only_target() {
        let cart = Cart::from(vec![item(1, 1), item(2, 4)]);
        let next = cart.incremented(ProductId::new(2)).unwrap();

        assert_eq!(next.get(ProductId::new(1)).unwrap().amount, 1);
        assert_eq!(next.get(ProductId::new(2)).unwrap().amount, 5);
        // Source cart is untouched
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 4);
    }

    #[test]
    fn test_incremented_missing_product() {
        assert!(Cart::new().incremented(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_incremented_at_max_amount() {
        let cart = Cart::from(vec![item(1, u32::MAX)]);
        assert!(cart.incremented(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_appended_keeps_order_and_uniqueness() {
        let cart = Cart::from(vec![item(1, 1)]);
        let next = cart.appended(item(2, 1)).unwrap();
        let ids: Vec<i32> = next.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(next.appended(item(1, 1)).is_none());
    }

    #[test]
    fn test_removed() {
        let cart = Cart::from(vec![item(1, 1), item(2, 1), item(3, 1)]);
        let next = cart.removed(ProductId::new(2)).unwrap();
        let ids: Vec<i32> = next.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(next.removed(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_with_amount_rejects_zero() {
        let cart = Cart::from(vec![item(1, 2)]);
        assert!(cart.with_amount(ProductId::new(1), 0).is_none());
        assert_eq!(
            cart.with_amount(ProductId::new(1), 7)
                .unwrap()
                .get(ProductId::new(1))
                .unwrap()
                .amount,
            7
        );
    }

    #[test]
    fn test_from_vec_merges_duplicates_and_drops_empty() {
        let cart = Cart::from(vec![item(1, 1), item(2, 0), item(1, 2), item(3, 1)]);
        let summary: Vec<(i32, u32)> = cart.iter().map(|i| (i.id.as_i32(), i.amount)).collect();
        assert_eq!(summary, vec![(1, 3), (3, 1)]);
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from(vec![item(1, 2), item(2, 1)]);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_amount(), 3);
        assert_eq!(cart.total().to_string(), "$300.00");
        assert_eq!(Cart::new().total(), Price::ZERO);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::from(vec![item(42, 1)]);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], 42);
        assert_eq!(json[0]["amount"], 1);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
