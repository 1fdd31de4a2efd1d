//! # Cart
//!
//! The generic cart container: an ordered, product-keyed list of items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation                 Items Change                  Publishes      │
//! │  ─────────                 ────────────                  ─────────      │
//! │                                                                         │
//! │  add(p, n) ──────────────► items[i].qty += n | push      always         │
//! │                                                                         │
//! │  increment(p) / _at(i) ──► items[i].qty += 1             on match       │
//! │                                                                         │
//! │  decrement(p) / _at(i) ──► qty -= 1, or remove at 1      on match       │
//! │                                                                         │
//! │  remove(p) / remove_at(i) ► items.remove(i)              on match       │
//! │                                                                         │
//! │  clean() ────────────────► items.clear()                 always         │
//! │                                                                         │
//! │  count / amount / item ──► (read only)                   never          │
//! │                                                                         │
//! │  NOTE: one successful mutation = exactly one published snapshot.       │
//! │        Errors and product-keyed misses publish nothing.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::error::CartResult;
use crate::feed::{StateFeed, Subscription, DEFAULT_FEED_CAPACITY};
use crate::product::{CartItem, CartProduct, Snapshot};
use crate::validation::{add_quantity, check_index, validate_items, validate_quantity};

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by product equality (adding the same product
///   increases quantity)
/// - Quantity is always >= 1 (decrementing from 1 removes the item)
/// - Insertion order is preserved; items are only appended or removed
#[derive(Debug)]
pub struct Cart<P> {
    /// Current snapshot, also the value replayed to new subscribers.
    feed: StateFeed<Snapshot<P>>,
}

impl<P: CartProduct> Cart<P> {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Creates an empty cart whose state feed buffers `capacity` snapshots
    /// per subscriber.
    pub fn with_feed_capacity(capacity: usize) -> Self {
        Cart {
            feed: StateFeed::with_capacity(Arc::new(Vec::new()), capacity),
        }
    }

    /// Creates a cart holding `items` (e.g. a restored snapshot).
    ///
    /// ## Errors
    /// - `Err(InvalidQuantity)` if any item has quantity 0
    /// - `Err(DuplicateProduct)` if two items hold equal products
    pub fn from_items(items: Vec<CartItem<P>>) -> CartResult<Self> {
        Self::from_items_with_capacity(items, DEFAULT_FEED_CAPACITY)
    }

    /// [`Cart::from_items`] with a custom feed buffer.
    pub fn from_items_with_capacity(
        items: Vec<CartItem<P>>,
        capacity: usize,
    ) -> CartResult<Self> {
        validate_items(&items)?;

        Ok(Cart {
            feed: StateFeed::with_capacity(Arc::new(items), capacity),
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: increases quantity in place
    /// - If product not in cart: appends a new item
    ///
    /// ## Returns
    /// - `Ok(())` on success (one snapshot published)
    /// - `Err(InvalidQuantity)` if `quantity` is 0
    /// - `Err(QuantityOverflow)` if the new quantity does not fit in `u32`
    pub fn add(&mut self, product: P, quantity: u32) -> CartResult<()> {
        let quantity = validate_quantity(quantity)?;

        let mut items = self.items().to_vec();
        match items.iter_mut().find(|item| item.product == product) {
            Some(item) => item.quantity = add_quantity(item.quantity, quantity)?,
            None => items.push(CartItem::new(product, quantity)),
        }

        self.publish(items);
        Ok(())
    }

    /// Adds a single unit of `product`.
    pub fn add_one(&mut self, product: P) -> CartResult<()> {
        self.add(product, 1)
    }

    /// Increments the quantity of the item at `index` by 1.
    pub fn increment_at(&mut self, index: usize) -> CartResult<()> {
        let index = check_index(index, self.count())?;
        self.step_up(index)
    }

    /// Increments the quantity of `product` by 1.
    ///
    /// Returns `Ok(false)` without publishing if the product is not in the cart.
    pub fn increment(&mut self, product: &P) -> CartResult<bool> {
        match self.position(product) {
            Some(index) => self.step_up(index).map(|()| true),
            None => Ok(false),
        }
    }

    /// Decrements the quantity of the item at `index` by 1, removing it
    /// when the quantity would reach 0.
    pub fn decrement_at(&mut self, index: usize) -> CartResult<()> {
        let index = check_index(index, self.count())?;
        self.step_down(index);
        Ok(())
    }

    /// Decrements the quantity of `product` by 1, removing it when the
    /// quantity would reach 0.
    ///
    /// Returns `false` without publishing if the product is not in the cart.
    pub fn decrement(&mut self, product: &P) -> bool {
        match self.position(product) {
            Some(index) => {
                self.step_down(index);
                true
            }
            None => false,
        }
    }

    /// Removes the item at `index` regardless of its quantity.
    ///
    /// Later items shift down by one position.
    pub fn remove_at(&mut self, index: usize) -> CartResult<CartItem<P>> {
        let index = check_index(index, self.count())?;

        let mut items = self.items().to_vec();
        let removed = items.remove(index);
        self.publish(items);
        Ok(removed)
    }

    /// Removes `product` regardless of its quantity.
    ///
    /// Returns `None` without publishing if the product is not in the cart.
    pub fn remove(&mut self, product: &P) -> Option<CartItem<P>> {
        let index = self.position(product)?;

        let mut items = self.items().to_vec();
        let removed = items.remove(index);
        self.publish(items);
        Some(removed)
    }

    /// Clears all items from the cart. Always publishes.
    pub fn clean(&mut self) {
        self.publish(Vec::new());
    }

    fn step_up(&mut self, index: usize) -> CartResult<()> {
        let mut items = self.items().to_vec();
        let item = &mut items[index];
        item.quantity = add_quantity(item.quantity, 1)?;
        self.publish(items);
        Ok(())
    }

    fn step_down(&mut self, index: usize) {
        let mut items = self.items().to_vec();
        if items[index].quantity > 1 {
            items[index].quantity -= 1;
        } else {
            items.remove(index);
        }
        self.publish(items);
    }

    fn publish(&mut self, items: Vec<CartItem<P>>) {
        self.feed.publish(Arc::new(items));
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the items in insertion order.
    pub fn items(&self) -> &[CartItem<P>] {
        self.feed.latest()
    }

    /// Returns the current snapshot (cheap to clone and send).
    pub fn snapshot(&self) -> Snapshot<P> {
        Arc::clone(self.feed.latest())
    }

    /// Returns the item at `index`.
    pub fn item(&self, index: usize) -> CartResult<&CartItem<P>> {
        let index = check_index(index, self.count())?;
        Ok(&self.items()[index])
    }

    /// Returns the number of distinct items in the cart.
    pub fn count(&self) -> usize {
        self.items().len()
    }

    /// Returns the total quantity of all items.
    pub fn count_quantities(&self) -> u64 {
        self.items().iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Calculates the cart amount: Σ price × quantity, unrounded.
    pub fn amount(&self) -> f64 {
        self.items().iter().map(CartItem::line_amount).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Returns the position of `product`, if present.
    pub fn position(&self, product: &P) -> Option<usize> {
        self.items().iter().position(|i| &i.product == product)
    }

    /// Checks if `product` is in the cart.
    pub fn contains(&self, product: &P) -> bool {
        self.position(product).is_some()
    }

    /// Returns the quantity of `product`, or 0 if absent.
    pub fn quantity_of(&self, product: &P) -> u32 {
        self.items()
            .iter()
            .find(|i| &i.product == product)
            .map_or(0, |i| i.quantity)
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Subscribes to state changes. The current snapshot arrives first.
    pub fn subscribe(&self) -> Subscription<Snapshot<P>> {
        self.feed.subscribe()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }
}

impl<P: CartProduct> Default for Cart<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartError;

    #[derive(Debug, Clone, PartialEq)]
    struct TestProduct {
        id: u32,
        price: f64,
    }

    impl CartProduct for TestProduct {
        fn price(&self) -> f64 {
            self.price
        }
    }

    fn test_product(id: u32, price: f64) -> TestProduct {
        TestProduct { id, price }
    }

    fn quantities(cart: &Cart<TestProduct>) -> Vec<(u32, u32)> {
        cart.items()
            .iter()
            .map(|i| (i.product.id, i.quantity))
            .collect()
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 9.99), 2).unwrap();

        assert_eq!(cart.count(), 1);
        assert_eq!(cart.count_quantities(), 2);
        assert!((cart.amount() - 19.98).abs() < 1e-9);
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);

        cart.add(p1.clone(), 2).unwrap();
        cart.add(p2, 1).unwrap();
        cart.add(p1, 3).unwrap();

        assert_eq!(quantities(&cart), vec![(1, 5), (2, 1)]);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.count_quantities(), 6);
    }

    #[test]
    fn test_cart_add_zero_is_rejected() {
        let mut cart = Cart::new();
        let mut sub = cart.subscribe();
        sub.try_recv();

        let err = cart.add(test_product(1, 1.0), 0).unwrap_err();

        assert_eq!(err, CartError::InvalidQuantity { quantity: 0 });
        assert!(cart.is_empty());
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_cart_add_overflow_leaves_state_untouched() {
        let p1 = test_product(1, 1.0);
        let mut cart = Cart::from_items(vec![CartItem::new(p1.clone(), u32::MAX)]).unwrap();

        assert!(matches!(
            cart.add(p1.clone(), 1),
            Err(CartError::QuantityOverflow { .. })
        ));
        assert_eq!(cart.quantity_of(&p1), u32::MAX);
    }

    #[test]
    fn test_cart_decrement_last_unit_removes_item() {
        let p1 = test_product(1, 1.0);
        let mut cart = Cart::from_items(vec![CartItem::new(p1.clone(), 1)]).unwrap();

        assert!(cart.decrement(&p1));

        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert!(!cart.contains(&p1));
    }

    #[test]
    fn test_cart_decrement_keeps_position() {
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);
        let mut cart = Cart::from_items(vec![CartItem::new(p1, 3), CartItem::new(p2, 1)]).unwrap();

        cart.decrement_at(0).unwrap();

        assert_eq!(quantities(&cart), vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn test_cart_decrement_at_last_unit_removes_item() {
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);
        let mut cart = Cart::from_items(vec![
            CartItem::new(p1.clone(), 1),
            CartItem::new(p2, 2),
        ])
        .unwrap();
        let mut sub = cart.subscribe();
        sub.try_recv();

        cart.decrement_at(0).unwrap();

        assert_eq!(quantities(&cart), vec![(2, 2)]);
        assert!(!cart.contains(&p1));
        assert_eq!(sub.try_recv().unwrap().len(), 1);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_cart_from_items_rejects_broken_lists() {
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);

        let zero = Cart::from_items(vec![CartItem::new(p1.clone(), 0)]);
        assert_eq!(
            zero.unwrap_err(),
            CartError::InvalidQuantity { quantity: 0 }
        );

        let repeated = Cart::from_items(vec![
            CartItem::new(p1.clone(), 1),
            CartItem::new(p2, 1),
            CartItem::new(p1, 2),
        ]);
        assert_eq!(
            repeated.unwrap_err(),
            CartError::DuplicateProduct { index: 2, first: 0 }
        );
    }

    #[test]
    fn test_cart_product_keyed_misses_are_noops() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 1.0), 1).unwrap();
        let mut sub = cart.subscribe();
        sub.try_recv();

        let missing = test_product(9, 1.0);
        assert!(!cart.increment(&missing).unwrap());
        assert!(!cart.decrement(&missing));
        assert!(cart.remove(&missing).is_none());

        assert_eq!(quantities(&cart), vec![(1, 1)]);
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_cart_increment() {
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);
        let mut cart = Cart::from_items(vec![
            CartItem::new(p1.clone(), 1),
            CartItem::new(p2, 1),
        ])
        .unwrap();

        assert!(cart.increment(&p1).unwrap());
        cart.increment_at(1).unwrap();

        assert_eq!(quantities(&cart), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_cart_index_operations_out_of_range() {
        let mut cart: Cart<TestProduct> = Cart::new();
        cart.add(test_product(1, 1.0), 1).unwrap();

        let expected = CartError::OutOfRange { index: 1, len: 1 };
        assert_eq!(cart.item(1).unwrap_err(), expected);
        assert_eq!(cart.increment_at(1).unwrap_err(), expected);
        assert_eq!(cart.decrement_at(1).unwrap_err(), expected);
        assert_eq!(cart.remove_at(1).unwrap_err(), expected);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_cart_remove_at_shifts_indices() {
        let p1 = test_product(1, 1.0);
        let p2 = test_product(2, 1.0);
        let mut cart = Cart::from_items(vec![CartItem::new(p1, 2), CartItem::new(p2, 1)]).unwrap();

        let removed = cart.remove_at(0).unwrap();

        assert_eq!(removed.product.id, 1);
        assert_eq!(quantities(&cart), vec![(2, 1)]);
        assert_eq!(cart.item(0).unwrap().product.id, 2);
    }

    #[test]
    fn test_cart_amount_is_recomputed() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 2.5), 2).unwrap();
        cart.add(test_product(2, 0.25), 4).unwrap();
        assert!((cart.amount() - 6.0).abs() < 1e-9);

        cart.remove_at(0).unwrap();
        assert!((cart.amount() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cart_clean() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 9.99), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clean();
        assert!(cart.is_empty());
        assert_eq!(cart.amount(), 0.0);
    }

    #[test]
    fn test_cart_one_snapshot_per_mutation() {
        let p1 = test_product(1, 1.0);
        let mut cart = Cart::new();
        let mut sub = cart.subscribe();
        assert!(sub.try_recv().unwrap().is_empty());

        cart.add(p1.clone(), 1).unwrap();
        cart.increment(&p1).unwrap();
        cart.decrement_at(0).unwrap();
        cart.decrement(&p1);
        cart.clean();

        let seen: Vec<Vec<u32>> = std::iter::from_fn(|| sub.try_recv())
            .map(|s| s.iter().map(|i| i.quantity).collect())
            .collect();
        assert_eq!(seen, vec![vec![1], vec![2], vec![1], vec![], vec![]]);
    }

    #[test]
    fn test_cart_late_subscriber_gets_current_snapshot_only() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 1.0), 2).unwrap();
        cart.add(test_product(2, 1.0), 1).unwrap();
        cart.increment_at(1).unwrap();

        let mut sub = cart.subscribe();
        let first = sub.try_recv().unwrap();

        assert_eq!(first.as_slice(), cart.items());
        assert!(sub.try_recv().is_none());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_mutations() {
        let mut cart = Cart::new();
        cart.add(test_product(1, 1.0), 1).unwrap();
        let before = cart.snapshot();

        cart.increment_at(0).unwrap();

        assert_eq!(before[0].quantity, 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }
}
