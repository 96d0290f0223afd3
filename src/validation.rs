//! Feed validation
//!
//! Replays a feed and checks the invariants every generated feed upholds, so
//! feeds produced elsewhere or edited by hand can be vetted before they are
//! fed to an engine under test.

use crate::types::{Event, EventKind, OrderId, Side};
use std::collections::{HashMap, HashSet};
use tracing::{error, info, warn};

/// Validation result with detailed findings
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub passed: bool,
    pub checks: Vec<ValidationCheck>,
}

#[derive(Debug, Clone)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub level: ValidationLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Critical,  // Feed is unusable as engine input
    Warning,   // Suspicious, but replayable
    Info,      // Informational only
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        ValidationResult {
            passed: true,
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, check: ValidationCheck) {
        if !check.passed && check.level == ValidationLevel::Critical {
            self.passed = false;
        }
        self.checks.push(check);
    }

    pub fn check(&self, name: &str) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn critical_failures(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Critical)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationCheck> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.level == ValidationLevel::Warning)
            .collect()
    }

    pub fn display(&self) {
        info!("🔍 Feed Validation");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        for check in &self.checks {
            let icon = if check.passed {
                "✅"
            } else {
                match check.level {
                    ValidationLevel::Critical => "❌",
                    ValidationLevel::Warning => "⚠️",
                    ValidationLevel::Info => "ℹ️",
                }
            };

            info!("{} {} - {}", icon, check.name, check.message);
        }

        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if !self.passed {
            let failures = self.critical_failures();
            error!("❌ Validation failed: {} critical issue(s)", failures.len());
            for failure in failures {
                error!("   • {}: {}", failure.name, failure.message);
            }
        } else {
            let warnings = self.warnings();
            if !warnings.is_empty() {
                warn!("⚠️  {} warning(s) detected", warnings.len());
                for warning in warnings {
                    warn!("   • {}: {}", warning.name, warning.message);
                }
            }
            info!("✅ All critical checks passed");
        }
    }
}

pub const CHECK_REFERENCES: &str = "Referential Integrity";
pub const CHECK_ORDER_IDS: &str = "Monotonic Order Ids";
pub const CHECK_CANCELS: &str = "Single Cancel";
pub const CHECK_QUANTITIES: &str = "Quantity Bounds";
pub const CHECK_ECHO: &str = "Side/Price Echo";
pub const CHECK_ADD_TIME: &str = "Add Time Ordering";
pub const CHECK_GLOBAL_TIME: &str = "Global Time Ordering";
pub const CHECK_SUMMARY: &str = "Summary";

/// Violation counter for one rule; keeps the first offending row for the report.
struct Tally {
    name: &'static str,
    level: ValidationLevel,
    ok_message: &'static str,
    violations: u64,
    first: Option<String>,
}

impl Tally {
    fn new(name: &'static str, level: ValidationLevel, ok_message: &'static str) -> Self {
        Self { name, level, ok_message, violations: 0, first: None }
    }

    fn fail(&mut self, row: usize, detail: impl FnOnce() -> String) {
        self.violations += 1;
        if self.first.is_none() {
            self.first = Some(format!("row {}: {}", row, detail()));
        }
    }

    fn into_check(self) -> ValidationCheck {
        let passed = self.violations == 0;
        let message = match self.first {
            None => self.ok_message.to_string(),
            Some(first) => format!("{} violation(s), first at {}", self.violations, first),
        };
        ValidationCheck {
            name: self.name.to_string(),
            passed,
            message,
            level: self.level,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AddedOrder {
    side: Side,
    price: i64,
    quantity: i64,
}

/// Validates feeds against the generator's invariants
pub struct FeedValidator;

impl FeedValidator {
    /// Run every check over `events` in emission order. Rows are numbered from 1.
    pub fn validate(events: &[Event]) -> ValidationResult {
        let mut references = Tally::new(CHECK_REFERENCES, ValidationLevel::Critical,
            "every cancel/execute follows an add of the same live order");
        let mut ids = Tally::new(CHECK_ORDER_IDS, ValidationLevel::Critical,
            "add ids strictly increase from 1");
        let mut cancels = Tally::new(CHECK_CANCELS, ValidationLevel::Critical,
            "no order is canceled twice");
        let mut quantities = Tally::new(CHECK_QUANTITIES, ValidationLevel::Critical,
            "add and execute quantities within bounds, cancel rows zeroed");
        let mut echo = Tally::new(CHECK_ECHO, ValidationLevel::Critical,
            "cancel/execute rows echo the added order");
        let mut add_time = Tally::new(CHECK_ADD_TIME, ValidationLevel::Critical,
            "adds strictly increase in time and follow-ups come after their add");
        let mut global_time = Tally::new(CHECK_GLOBAL_TIME, ValidationLevel::Info,
            "timestamps are non-decreasing across the whole feed");

        let mut added: HashMap<OrderId, AddedOrder> = HashMap::new();
        let mut canceled: HashSet<OrderId> = HashSet::new();
        let mut last_add_id: Option<OrderId> = None;
        let mut last_add_ts: Option<u64> = None;
        let mut last_ts: Option<u64> = None;
        let (mut n_add, mut n_cancel, mut n_exec) = (0u64, 0u64, 0u64);

        for (idx, ev) in events.iter().enumerate() {
            let row = idx + 1;

            if let Some(prev) = last_ts {
                if ev.timestamp < prev {
                    global_time.fail(row, || format!("ts {} after ts {}", ev.timestamp, prev));
                }
            }
            last_ts = Some(ev.timestamp);

            match ev.kind {
                EventKind::Add => {
                    n_add += 1;
                    let expected_min = last_add_id.map_or(1, |id| id + 1);
                    let first_add = last_add_id.is_none();
                    if (first_add && ev.order_id != 1) || ev.order_id < expected_min {
                        ids.fail(row, || format!("add id {} (expected {})", ev.order_id,
                            if first_add { "1".to_string() } else { format!(">= {}", expected_min) }));
                    }
                    if added.contains_key(&ev.order_id) {
                        references.fail(row, || format!("order {} added twice", ev.order_id));
                    }
                    if let Some(prev) = last_add_ts {
                        if ev.timestamp <= prev {
                            add_time.fail(row, || format!("add ts {} not after previous add ts {}", ev.timestamp, prev));
                        }
                    }
                    if ev.quantity < 1 {
                        quantities.fail(row, || format!("add qty {}", ev.quantity));
                    }
                    last_add_id = Some(last_add_id.map_or(ev.order_id, |id| id.max(ev.order_id)));
                    last_add_ts = Some(ev.timestamp);
                    added.entry(ev.order_id).or_insert(AddedOrder {
                        side: ev.side,
                        price: ev.price,
                        quantity: ev.quantity,
                    });
                }
                EventKind::Cancel | EventKind::Execute => {
                    if ev.kind == EventKind::Cancel {
                        n_cancel += 1;
                    } else {
                        n_exec += 1;
                    }

                    if let Some(add_ts) = last_add_ts {
                        if ev.timestamp <= add_ts {
                            add_time.fail(row, || format!("{} ts {} not after add ts {}", ev.kind, ev.timestamp, add_ts));
                        }
                    }

                    let Some(order) = added.get(&ev.order_id).copied() else {
                        references.fail(row, || format!("{} for unknown order {}", ev.kind, ev.order_id));
                        continue;
                    };

                    if canceled.contains(&ev.order_id) {
                        if ev.kind == EventKind::Cancel {
                            cancels.fail(row, || format!("order {} canceled again", ev.order_id));
                        } else {
                            references.fail(row, || format!("execute for canceled order {}", ev.order_id));
                        }
                    }

                    if ev.side != order.side {
                        echo.fail(row, || format!("side {} differs from add side {}", ev.side.code(), order.side.code()));
                    }

                    if ev.kind == EventKind::Cancel {
                        if ev.price != 0 || ev.quantity != 0 {
                            quantities.fail(row, || format!("cancel carries px {} qty {}", ev.price, ev.quantity));
                        }
                        canceled.insert(ev.order_id);
                    } else {
                        if ev.price != order.price {
                            echo.fail(row, || format!("execute px {} differs from add px {}", ev.price, order.price));
                        }
                        if ev.quantity < 1 || ev.quantity > order.quantity {
                            quantities.fail(row, || format!("execute qty {} outside [1, {}]", ev.quantity, order.quantity));
                        }
                    }
                }
            }
        }

        let mut result = ValidationResult::new();
        for tally in [references, ids, cancels, quantities, echo, add_time, global_time] {
            result.add_check(tally.into_check());
        }
        result.add_check(ValidationCheck {
            name: CHECK_SUMMARY.to_string(),
            passed: true,
            message: format!("{} rows: {} adds, {} cancels, {} executes", events.len(), n_add, n_cancel, n_exec),
            level: ValidationLevel::Info,
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn order(id: OrderId, side: Side, price: i64, qty: i64) -> Order {
        Order { id, side, price, remaining_quantity: qty }
    }

    #[test]
    fn test_clean_feed_passes() {
        let a = order(1, Side::Buy, 99, 4);
        let b = order(2, Side::Sell, 103, 2);
        let events = vec![
            Event::add(10, &a),
            Event::execute(25, &a, 3),
            Event::add(20, &b),
            Event::cancel(30, &a),
        ];
        let result = FeedValidator::validate(&events);
        assert!(result.passed);
        // The execute jitter overtakes the next add
        assert!(!result.check(CHECK_GLOBAL_TIME).unwrap().passed);
    }

    #[test]
    fn test_unknown_reference_fails() {
        let ghost = order(5, Side::Buy, 99, 1);
        let events = vec![Event::cancel(3, &ghost)];
        let result = FeedValidator::validate(&events);
        assert!(!result.passed);
        assert!(!result.check(CHECK_REFERENCES).unwrap().passed);
    }

    #[test]
    fn test_double_cancel_and_execute_after_cancel() {
        let a = order(1, Side::Sell, 101, 3);
        let events = vec![
            Event::add(1, &a),
            Event::cancel(5, &a),
            Event::cancel(6, &a),
            Event::execute(7, &a, 1),
        ];
        let result = FeedValidator::validate(&events);
        assert!(!result.check(CHECK_CANCELS).unwrap().passed);
        assert!(!result.check(CHECK_REFERENCES).unwrap().passed);
    }

    #[test]
    fn test_over_execution_fails() {
        let a = order(1, Side::Sell, 101, 3);
        let events = vec![Event::add(1, &a), Event::execute(2, &a, 4)];
        let result = FeedValidator::validate(&events);
        let check = result.check(CHECK_QUANTITIES).unwrap();
        assert!(!check.passed);
        assert!(check.message.contains("row 2"));
    }

    #[test]
    fn test_ids_must_start_at_one() {
        let events = vec![Event::add(1, &order(2, Side::Buy, 99, 1))];
        let result = FeedValidator::validate(&events);
        assert!(!result.check(CHECK_ORDER_IDS).unwrap().passed);
    }

    #[test]
    fn test_side_echo() {
        let a = order(1, Side::Sell, 101, 3);
        let wrong = order(1, Side::Buy, 101, 3);
        let events = vec![Event::add(1, &a), Event::cancel(2, &wrong)];
        let result = FeedValidator::validate(&events);
        assert!(!result.check(CHECK_ECHO).unwrap().passed);
    }

    #[test]
    fn test_summary_counts() {
        let a = order(1, Side::Sell, 101, 3);
        let events = vec![Event::add(1, &a), Event::execute(2, &a, 1), Event::cancel(3, &a)];
        let result = FeedValidator::validate(&events);
        let summary = result.check(CHECK_SUMMARY).unwrap();
        assert!(summary.message.contains("1 adds, 1 cancels, 1 executes"));
    }
}
