// Generator parameters and their validation

use serde::{Deserialize, Serialize};

/// Tunables for the order-flow generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Starting reference price in ticks
    pub base_price: i64,
    /// Chance that an iteration advances the clock by a burst gap
    pub burst_probability: f64,
    pub cancel_probability: f64,
    pub execute_probability: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            base_price: 10_000,
            burst_probability: 0.05,
            cancel_probability: 0.15,
            execute_probability: 0.10,
        }
    }
}

impl GeneratorParams {
    /// Reject any probability that is NaN or outside `[0, 1]`. Values are never clamped.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        check_probability("burst_probability", self.burst_probability)?;
        check_probability("cancel_probability", self.cancel_probability)?;
        check_probability("execute_probability", self.execute_probability)?;
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), GeneratorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidProbability { name, value })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}
