//! Core domain types for listforge runs.

use serde::{Deserialize, Serialize};

/// Aggregate statistics over a completed batch of fetch attempts.
///
/// Derived once after every outcome has been collected; `success +
/// failed_count() == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of sources submitted to the pool.
    pub total: usize,
    /// Number of sources that downloaded successfully.
    pub success: usize,
    /// URLs that failed, in original source-list order.
    pub failed: Vec<String>,
}

impl RunSummary {
    /// A summary for a run with no sources at all.
    pub fn empty() -> Self {
        Self {
            total: 0,
            success: 0,
            failed: Vec::new(),
        }
    }

    /// Number of sources that failed.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when at least one source was submitted and none succeeded.
    pub fn is_total_failure(&self) -> bool {
        self.total > 0 && self.success == 0
    }

    /// Percentage of submitted sources that succeeded (100 for an empty run).
    pub fn success_percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.success * 100) / self.total) as u8
    }
}
