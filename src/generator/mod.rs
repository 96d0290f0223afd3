//! Synthetic order-flow generator
//!
//! Emits a temporally ordered stream of Add / Cancel / Execute events over a
//! synthetic population of resting orders. Output is fully determined by the
//! seed, the parameters and the draw order in [`OrderFlowGenerator::step`];
//! reordering, adding or removing a draw changes every feed produced for a seed.

pub mod live_orders;
pub mod params;

pub use live_orders::LiveOrders;
pub use params::{GeneratorError, GeneratorParams};

use crate::types::{Event, Order, OrderId, Side};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Inclusive gap ranges in nanoseconds
const BURST_GAP_NS: (u64, u64) = (50, 500);
const NORMAL_GAP_NS: (u64, u64) = (1, 50);
const MAX_PRICE_OFFSET: i64 = 5;
const QTY_RANGE: (i64, i64) = (1, 5);
const CANCEL_JITTER_NS: (u64, u64) = (1, 20);
const EXECUTE_JITTER_NS: (u64, u64) = (1, 30);
/// Executed fraction of the order quantity is drawn from `[0.2, 1.0)`
const EXECUTE_FRACTION: (f64, f64) = (0.2, 1.0);

/// Running counters for one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorStats {
    pub adds: u64,
    pub cancels: u64,
    pub executes: u64,
    pub bursts: u64,
}

impl GeneratorStats {
    pub fn total_events(&self) -> u64 {
        self.adds + self.cancels + self.executes
    }
}

/// Events produced by a single iteration: always one Add, then optionally a
/// Cancel and an Execute, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    pub add: Event,
    pub cancel: Option<Event>,
    pub execute: Option<Event>,
}

impl Iteration {
    pub fn events(&self) -> impl Iterator<Item = Event> {
        std::iter::once(self.add)
            .chain(self.cancel)
            .chain(self.execute)
    }
}

/// Generator state. Owns its random stream and the
/// `(clock, base_price, next_id, live)` simulation state exclusively.
#[derive(Debug, Clone)]
pub struct OrderFlowGenerator<R: Rng> {
    params: GeneratorParams,
    rng: R,
    clock: u64,
    base_price: i64,
    next_id: OrderId,
    live: LiveOrders,
    stats: GeneratorStats,
}

impl OrderFlowGenerator<ChaCha8Rng> {
    /// Generator on the pinned random stream: `ChaCha8Rng::seed_from_u64(seed)`.
    pub fn seeded(params: GeneratorParams, seed: u64) -> Result<Self, GeneratorError> {
        debug!(seed, ?params, "Seeding order-flow generator");
        Self::new(params, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> OrderFlowGenerator<R> {
    /// Create a generator on a caller-supplied random stream.
    /// Parameters are validated here, before any event exists.
    pub fn new(params: GeneratorParams, rng: R) -> Result<Self, GeneratorError> {
        params.validate()?;
        Ok(Self {
            params,
            rng,
            clock: 0,
            base_price: params.base_price,
            next_id: 1,
            live: LiveOrders::new(),
            stats: GeneratorStats::default(),
        })
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Timestamp of the most recent Add
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Current drifted reference price
    pub fn base_price(&self) -> i64 {
        self.base_price
    }

    pub fn live_orders(&self) -> &LiveOrders {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn stats(&self) -> GeneratorStats {
        self.stats
    }

    /// Run one iteration.
    pub fn step(&mut self) -> Iteration {
        // Clock
        let gap = if self.rng.gen::<f64>() < self.params.burst_probability {
            self.stats.bursts += 1;
            self.rng.gen_range(BURST_GAP_NS.0..=BURST_GAP_NS.1)
        } else {
            self.rng.gen_range(NORMAL_GAP_NS.0..=NORMAL_GAP_NS.1)
        };
        self.clock += gap;

        // Reference price drift
        self.base_price += self.rng.gen_range(-1i64..=1);

        // New resting order
        let side = if self.rng.gen::<f64>() < 0.5 { Side::Sell } else { Side::Buy };
        let offset = self.rng.gen_range(0..=MAX_PRICE_OFFSET);
        let price = self.base_price + offset * side.offset_sign();
        let quantity = self.rng.gen_range(QTY_RANGE.0..=QTY_RANGE.1);

        let order = Order {
            id: self.next_id,
            side,
            price,
            remaining_quantity: quantity,
        };
        self.next_id += 1;
        self.live.insert(order);
        self.stats.adds += 1;
        let add = Event::add(self.clock, &order);

        let cancel = self.maybe_cancel();
        let execute = self.maybe_execute();

        Iteration { add, cancel, execute }
    }

    fn maybe_cancel(&mut self) -> Option<Event> {
        if self.live.is_empty() || self.rng.gen::<f64>() >= self.params.cancel_probability {
            return None;
        }
        let target = self.live.pick(&mut self.rng)?;
        let jitter = self.rng.gen_range(CANCEL_JITTER_NS.0..=CANCEL_JITTER_NS.1);
        self.live.remove(target.id);
        self.stats.cancels += 1;
        trace!(order_id = target.id, "cancel");
        Some(Event::cancel(self.clock + jitter, &target))
    }

    /// Draws from the set as left by `maybe_cancel`, so an order canceled in
    /// this iteration cannot be executed in it. The order stays live and its
    /// quantity is not decremented.
    fn maybe_execute(&mut self) -> Option<Event> {
        if self.live.is_empty() || self.rng.gen::<f64>() >= self.params.execute_probability {
            return None;
        }
        let target = self.live.pick(&mut self.rng)?;
        let fraction = self.rng.gen_range(EXECUTE_FRACTION.0..EXECUTE_FRACTION.1);
        let executed = ((target.remaining_quantity as f64 * fraction).floor() as i64).max(1);
        let jitter = self.rng.gen_range(EXECUTE_JITTER_NS.0..=EXECUTE_JITTER_NS.1);
        self.stats.executes += 1;
        trace!(order_id = target.id, executed, "execute");
        Some(Event::execute(self.clock + jitter, &target, executed))
    }

    /// Lazily produce the events of `count` iterations.
    pub fn into_stream(self, count: usize) -> EventStream<R> {
        EventStream {
            generator: self,
            remaining: count,
            pending: VecDeque::with_capacity(3),
        }
    }
}

/// Iterator over the events of a bounded number of iterations.
#[derive(Debug, Clone)]
pub struct EventStream<R: Rng> {
    generator: OrderFlowGenerator<R>,
    remaining: usize,
    pending: VecDeque<Event>,
}

impl<R: Rng> EventStream<R> {
    /// Iterations not yet started
    pub fn remaining_iterations(&self) -> usize {
        self.remaining
    }

    pub fn generator(&self) -> &OrderFlowGenerator<R> {
        &self.generator
    }
}

impl<R: Rng> Iterator for EventStream<R> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let iteration = self.generator.step();
        self.pending.extend(iteration.cancel);
        self.pending.extend(iteration.execute);
        Some(iteration.add)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.pending.len();
        (
            pending + self.remaining,
            self.remaining.checked_mul(3).and_then(|n| n.checked_add(pending)),
        )
    }
}

/// Eagerly generate the feed for `(count, seed, params)`.
pub fn generate(count: usize, seed: u64, params: GeneratorParams) -> Result<Vec<Event>, GeneratorError> {
    let generator = OrderFlowGenerator::seeded(params, seed)?;
    Ok(generator.into_stream(count).collect())
}
