// Room availability lookup
// The submitter only knows the AvailabilityOracle trait; an inventory service
// can replace the random stand-in without touching the workflow.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Availability service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Availability check timed out after {0}ms")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

#[async_trait]
pub trait AvailabilityOracle: Send + Sync + 'static {
    // true when a room of this type can be booked for the given night
    async fn check(&self, room_type: &str, date: NaiveDate) -> Result<bool, AvailabilityError>;
}

#[derive(Debug, Clone)]
pub struct RandomAvailabilityConfig {
    pub unavailable_probability: f64,
    pub seed: Option<u64>,
}

impl Default for RandomAvailabilityConfig {
    fn default() -> Self {
        Self {
            unavailable_probability: 0.3,
            seed: None,
        }
    }
}

// Demo stand-in that reports no availability for a fixed share of checks.
pub struct RandomAvailability {
    unavailable_probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomAvailability {
    pub fn new(config: RandomAvailabilityConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            unavailable_probability: config.unavailable_probability.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }
}

impl Default for RandomAvailability {
    fn default() -> Self {
        Self::new(RandomAvailabilityConfig::default())
    }
}

#[async_trait]
impl AvailabilityOracle for RandomAvailability {
    async fn check(&self, room_type: &str, date: NaiveDate) -> Result<bool, AvailabilityError> {
        let roll: f64 = self.rng.lock().gen();
        let available = roll >= self.unavailable_probability;
        debug!(room_type, %date, available, "simulated availability check");
        Ok(available)
    }
}
