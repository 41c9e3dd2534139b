//! Cost control for external judge calls.
//!
//! The re-ranker treats the guard as an external arbiter: it asks
//! [`BudgetGuard::may_call`] before every call and reports actual spend with
//! [`BudgetGuard::record_cost`]. A guard that starts refusing may keep
//! refusing for the remainder of the request; the re-ranker simply stops
//! issuing calls and the affected candidates degrade to null semantic
//! components.

#[cfg(test)]
mod tests;

use parking_lot::Mutex;
use tracing::debug;

/// Default per-request ceiling for judge spend, in EUR.
pub const DEFAULT_REQUEST_BUDGET_EUR: f64 = 0.30;

/// Flat cost estimate for one judge assessment, in EUR. Conservative for a
/// small chat model on a two-summary prompt.
pub const ESTIMATED_ASSESSMENT_COST_EUR: f64 = 0.002;

/// External arbiter for judge spend.
pub trait BudgetGuard: Send + Sync {
    /// Returns `true` if a call with `estimated_cost` (EUR) may proceed.
    fn may_call(&self, estimated_cost: f64) -> bool;

    /// Records the actual cost (EUR) of a completed call.
    fn record_cost(&self, actual_cost: f64);
}

/// A per-request ledger with a hard ceiling.
///
/// Reservation-free: `may_call` checks spent + estimate against the
/// ceiling, `record_cost` adds actual spend. With bounded concurrency the
/// overshoot is at most (permits − 1) estimates, which the flat estimate
/// absorbs.
#[derive(Debug)]
pub struct RequestBudget {
    ceiling_eur: f64,
    spent_eur: Mutex<f64>,
}

impl RequestBudget {
    pub fn new(ceiling_eur: f64) -> Self {
        Self {
            ceiling_eur,
            spent_eur: Mutex::new(0.0),
        }
    }

    /// Total recorded spend so far.
    pub fn spent_eur(&self) -> f64 {
        *self.spent_eur.lock()
    }

    /// The configured ceiling.
    pub fn ceiling_eur(&self) -> f64 {
        self.ceiling_eur
    }
}

impl Default for RequestBudget {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_BUDGET_EUR)
    }
}

impl BudgetGuard for RequestBudget {
    fn may_call(&self, estimated_cost: f64) -> bool {
        let spent = *self.spent_eur.lock();
        let allowed = spent + estimated_cost <= self.ceiling_eur;

        if !allowed {
            debug!(
                spent_eur = spent,
                estimated_cost_eur = estimated_cost,
                ceiling_eur = self.ceiling_eur,
                "Budget guard refused call"
            );
        }

        allowed
    }

    fn record_cost(&self, actual_cost: f64) {
        *self.spent_eur.lock() += actual_cost;
    }
}

/// A guard that never refuses and records nothing. For offline evaluation
/// runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmetered;

impl BudgetGuard for Unmetered {
    fn may_call(&self, _estimated_cost: f64) -> bool {
        true
    }

    fn record_cost(&self, _actual_cost: f64) {}
}
