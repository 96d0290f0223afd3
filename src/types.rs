// Common types used across the feed tooling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order identifier. Allocated from 1 and never reused within a feed.
pub type OrderId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,   // Priced at or below the reference price
    Sell,  // Priced at or above the reference price
}

impl Side {
    /// Wire code used in the `side` column.
    pub fn code(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Direction in which the price offset is applied to the reference price.
    pub fn offset_sign(self) -> i64 {
        match self {
            Side::Buy => -1,
            Side::Sell => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Add,
    Cancel,
    Execute,
}

impl EventKind {
    /// Wire code used in the `type` column.
    pub fn code(self) -> char {
        match self {
            EventKind::Add => 'A',
            EventKind::Cancel => 'C',
            EventKind::Execute => 'E',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(EventKind::Add),
            "C" => Some(EventKind::Cancel),
            "E" => Some(EventKind::Execute),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A synthetic resting order held in the live-order set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: i64,
    /// Quantity at creation. Executions never decrement it.
    pub remaining_quantity: i64,
}

/// One row of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    pub order_id: OrderId,
    pub side: Side,
    pub price: i64,
    pub quantity: i64,
}

impl Event {
    pub fn add(timestamp: u64, order: &Order) -> Self {
        Event {
            timestamp,
            kind: EventKind::Add,
            order_id: order.id,
            side: order.side,
            price: order.price,
            quantity: order.remaining_quantity,
        }
    }

    /// Cancel rows carry the side only; price and quantity are zero.
    pub fn cancel(timestamp: u64, order: &Order) -> Self {
        Event {
            timestamp,
            kind: EventKind::Cancel,
            order_id: order.id,
            side: order.side,
            price: 0,
            quantity: 0,
        }
    }

    pub fn execute(timestamp: u64, order: &Order, executed: i64) -> Self {
        Event {
            timestamp,
            kind: EventKind::Execute,
            order_id: order.id,
            side: order.side,
            price: order.price,
            quantity: executed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_codes() {
        assert_eq!(Side::Buy.code(), 0);
        assert_eq!(Side::Sell.code(), 1);
        assert_eq!(Side::from_code(1), Some(Side::Sell));
        assert_eq!(Side::from_code(2), None);
    }

    #[test]
    fn test_sell_offsets_upward() {
        assert_eq!(Side::Sell.offset_sign(), 1);
        assert_eq!(Side::Buy.offset_sign(), -1);
    }

    #[test]
    fn test_cancel_zeroes_price_and_quantity() {
        let order = Order { id: 7, side: Side::Sell, price: 10_003, remaining_quantity: 4 };
        let ev = Event::cancel(120, &order);
        assert_eq!(ev.kind, EventKind::Cancel);
        assert_eq!(ev.side, Side::Sell);
        assert_eq!(ev.price, 0);
        assert_eq!(ev.quantity, 0);
    }

    #[test]
    fn test_kind_codes() {
        for kind in [EventKind::Add, EventKind::Cancel, EventKind::Execute] {
            let code = kind.code().to_string();
            assert_eq!(EventKind::from_code(&code), Some(kind));
        }
        assert_eq!(EventKind::from_code("X"), None);
    }
}
