//! Unit-cost bookkeeping for the `YouTube` Data API.
//!
//! The API charges each operation a fixed number of quota units against a
//! daily allowance. [`QuotaLedger`] tracks units spent in this run and
//! refuses a charge that would cross the configured budget, so a run stops
//! collecting before the API starts rejecting requests.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::YouTubeError;

/// Cost of one `search.list` call, in quota units.
pub const SEARCH_COST: u64 = 100;

/// Cost of one `videos.list` call, in quota units.
pub const VIDEO_DETAILS_COST: u64 = 1;

/// The API's default daily allowance, in quota units.
pub const DEFAULT_DAILY_BUDGET: u64 = 10_000;

/// Tracks quota units spent against a fixed budget.
#[derive(Debug)]
pub struct QuotaLedger {
    used: AtomicU64,
    limit: u64,
}

impl QuotaLedger {
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self {
            used: AtomicU64::new(0),
            limit,
        }
    }

    /// Charge `cost` units against the budget.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::BudgetExceeded`] without recording the charge
    /// if it would cross the budget.
    pub fn charge(&self, cost: u64) -> Result<(), YouTubeError> {
        self.used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                let next = used.saturating_add(cost);
                (next <= self.limit).then_some(next)
            })
            .map(|_| ())
            .map_err(|used| YouTubeError::BudgetExceeded {
                used,
                limit: self.limit,
            })
    }

    /// Units charged so far.
    #[must_use]
    pub fn used(&self) -> u64 {
        self.used.load(Ordering::SeqCst)
    }

    /// Units still available.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used())
    }
}
