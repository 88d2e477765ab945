//! Queue position and ETA estimates
//!
//! Both figures are simulated. They sit behind traits so a real backlog signal
//! can replace them without touching the intake flow.

use std::ops::{Range, RangeInclusive};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use gemquote_core::models::QueueEstimate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SessionError;
use crate::session::SessionStore;

/// Queue positions handed out to a new session.
pub const QUEUE_POSITION_RANGE: RangeInclusive<u32> = 4..=13;

/// Turnaround estimates in whole hours, upper bound exclusive.
pub const ETA_HOURS_RANGE: Range<u32> = 12..21;

pub trait QueueEstimator: Send + Sync {
    /// Today's position for this session, created on first use and stable
    /// afterwards. `None` when the estimate is unavailable.
    fn get_or_create(&self, date: NaiveDate) -> Option<QueueEstimate>;

    /// Display-only daily capacity the estimate is measured against.
    fn daily_limit(&self) -> u32;
}

pub trait EtaEstimator: Send + Sync {
    fn eta_hours(&self) -> u32;
}

/// Session storage key for a day's estimate.
pub fn queue_key(date: NaiveDate) -> String {
    format!("queue-{}", date.format("%Y-%m-%d"))
}

/// Draws a position once per session and day and remembers it in session storage.
pub struct SimulatedQueueEstimator {
    session: Arc<dyn SessionStore>,
    daily_limit: u32,
    rng: Mutex<StdRng>,
}

impl SimulatedQueueEstimator {
    pub fn new(session: Arc<dyn SessionStore>, daily_limit: u32) -> Self {
        Self::with_rng(session, daily_limit, StdRng::from_os_rng())
    }

    pub fn with_rng(session: Arc<dyn SessionStore>, daily_limit: u32, rng: StdRng) -> Self {
        SimulatedQueueEstimator {
            session,
            daily_limit,
            rng: Mutex::new(rng),
        }
    }

    fn try_get_or_create(&self, date: NaiveDate) -> Result<QueueEstimate, SessionError> {
        let key = queue_key(date);
        if let Some(stored) = self.session.get(&key)? {
            return Ok(serde_json::from_str(&stored)?);
        }

        let next = self
            .rng
            .lock()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?
            .random_range(QUEUE_POSITION_RANGE);
        let estimate = QueueEstimate::new(next, self.daily_limit);

        self.session.set(&key, &serde_json::to_string(&estimate)?)?;
        tracing::debug!(key = %key, next = estimate.next, left = estimate.left, "Queue estimate created");
        Ok(estimate)
    }
}

impl QueueEstimator for SimulatedQueueEstimator {
    fn get_or_create(&self, date: NaiveDate) -> Option<QueueEstimate> {
        match self.try_get_or_create(date) {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                tracing::warn!(error = %e, %date, "Queue estimate unavailable");
                None
            }
        }
    }

    fn daily_limit(&self) -> u32 {
        self.daily_limit
    }
}

/// Uniform ETA in [`ETA_HOURS_RANGE`].
pub struct RandomEtaEstimator {
    rng: Mutex<StdRng>,
}

impl RandomEtaEstimator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        RandomEtaEstimator {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for RandomEtaEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl EtaEstimator for RandomEtaEstimator {
    fn eta_hours(&self) -> u32 {
        match self.rng.lock() {
            Ok(mut rng) => rng.random_range(ETA_HOURS_RANGE),
            Err(poisoned) => poisoned.into_inner().random_range(ETA_HOURS_RANGE),
        }
    }
}
