//! Usage-related types.
//!
//! - [`UsageSnapshot`] - Premium requests used against a monthly quota
//! - [`QuotaReport`] - What a quota backend found

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Usage Snapshot
// ============================================================================

/// Premium-request usage at the moment of a quota query.
///
/// Values are `f64` because billing usage items carry fractional gross
/// quantities (model multipliers such as 0.33x).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Premium requests consumed in the current period.
    pub used: f64,
    /// Premium requests included in the plan.
    pub quota: f64,
    /// Premium requests left, never negative.
    pub remaining: f64,
}

impl UsageSnapshot {
    /// Builds a snapshot from a consumed count and a quota.
    pub fn from_used(used: f64, quota: f64) -> Self {
        Self {
            used,
            quota,
            remaining: (quota - used).max(0.0),
        }
    }

    /// Builds a snapshot from an entitlement and the remaining count.
    pub fn from_remaining(entitlement: f64, remaining: f64) -> Self {
        Self::from_used(entitlement - remaining, entitlement)
    }

    /// Raw percentage of the quota consumed (may exceed 100).
    pub fn used_percent(&self) -> f64 {
        if self.quota > 0.0 {
            (self.used / self.quota) * 100.0
        } else {
            0.0
        }
    }

    /// Validates the snapshot data.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if any value is non-finite, the
    /// quota is not positive, or usage is negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.used.is_finite() || !self.quota.is_finite() || !self.remaining.is_finite() {
            return Err(CoreError::InvalidData(format!(
                "non-finite usage values: used={}, quota={}",
                self.used, self.quota
            )));
        }
        if self.quota <= 0.0 {
            return Err(CoreError::InvalidData(format!(
                "quota must be positive, got {}",
                self.quota
            )));
        }
        if self.used < 0.0 {
            return Err(CoreError::InvalidData(format!(
                "used must not be negative, got {}",
                self.used
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Quota Report
// ============================================================================

/// Result of a successful quota query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "snapshot", rename_all = "snake_case")]
pub enum QuotaReport {
    /// The plan has a finite premium-request quota.
    Metered(UsageSnapshot),
    /// Unlimited plan, or no premium quota reported at all.
    Unmetered,
}

impl QuotaReport {
    /// Returns the snapshot for metered plans.
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        match self {
            Self::Metered(snapshot) => Some(snapshot),
            Self::Unmetered => None,
        }
    }
}
