// Live-order set: orders still eligible for cancel or execute

use crate::types::{Order, OrderId};
use rand::Rng;
use std::collections::HashMap;

/// Dense id vector plus an index map, so a uniform pick is a single
/// `gen_range` draw and removal is O(1).
///
/// Removal swaps the last id into the freed slot. The resulting order is a
/// pure function of the insert/remove history, which keeps picks reproducible.
#[derive(Debug, Clone, Default)]
pub struct LiveOrders {
    ids: Vec<OrderId>,
    orders: HashMap<OrderId, (usize, Order)>,
}

impl LiveOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id).map(|(_, order)| order)
    }

    /// Insert a new order. Ids are unique, so an existing entry is never overwritten.
    pub fn insert(&mut self, order: Order) {
        if self.orders.contains_key(&order.id) {
            return;
        }
        self.orders.insert(order.id, (self.ids.len(), order));
        self.ids.push(order.id);
    }

    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let (slot, order) = self.orders.remove(&id)?;
        self.ids.swap_remove(slot);
        if let Some(&moved) = self.ids.get(slot) {
            if let Some(entry) = self.orders.get_mut(&moved) {
                entry.0 = slot;
            }
        }
        Some(order)
    }

    /// Uniformly pick a live order. Consumes exactly one draw when non-empty, none otherwise.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<Order> {
        if self.ids.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.ids.len());
        self.get(self.ids[slot]).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn order(id: OrderId) -> Order {
        Order { id, side: Side::Buy, price: 100, remaining_quantity: 1 }
    }

    #[test]
    fn test_insert_and_remove() {
        let mut live = LiveOrders::new();
        for id in 1..=4 {
            live.insert(order(id));
        }
        assert_eq!(live.len(), 4);

        assert_eq!(live.remove(2).map(|o| o.id), Some(2));
        assert!(!live.contains(2));
        assert_eq!(live.len(), 3);

        // The id swapped into the freed slot is still reachable and removable
        assert!(live.contains(4));
        assert_eq!(live.remove(4).map(|o| o.id), Some(4));
        assert_eq!(live.remove(4), None);
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn test_pick_on_empty_set() {
        let live = LiveOrders::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(live.pick(&mut rng).is_none());
    }

    #[test]
    fn test_pick_only_returns_live_orders() {
        let mut live = LiveOrders::new();
        for id in 1..=10 {
            live.insert(order(id));
        }
        live.remove(3);
        live.remove(7);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..500 {
            let picked = live.pick(&mut rng).unwrap();
            assert!(picked.id != 3 && picked.id != 7);
            assert!(live.contains(picked.id));
        }
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let mut live = LiveOrders::new();
        live.insert(order(1));
        live.insert(Order { price: 999, ..order(1) });
        assert_eq!(live.len(), 1);
        assert_eq!(live.get(1).map(|o| o.price), Some(100));
    }
}
