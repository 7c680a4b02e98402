//! Per-image time budget for blocking model calls

use crate::error::{Result, SetError, Stage};
use std::time::{Duration, Instant};

/// Start time of one analysis plus an optional budget.
///
/// Model calls cannot be interrupted; the budget is checked after each one
/// returns.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn unbounded() -> Self {
        Self::start(None)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fail with `DetectionTimeout` if the budget is spent
    pub fn check(&self, stage: Stage) -> Result<()> {
        let Some(budget) = self.budget else {
            return Ok(());
        };
        let elapsed = self.elapsed();
        if elapsed > budget {
            return Err(SetError::DetectionTimeout {
                stage,
                elapsed,
                budget,
            });
        }
        Ok(())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}
