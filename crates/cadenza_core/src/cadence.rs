//! Posting cadence rules.

use serde::{Deserialize, Serialize};

/// Client/platform posting cadence constraints.
///
/// Both rules are optional; an absent rule is not enforced. The scheduler
/// applies the minimum gap first, then the weekly cap, pushing requested
/// times forward when either would be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CadenceRules {
    /// Minimum hours between publishes for the same (account, platform)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hours_between: Option<i64>,
    /// Maximum publishes in any trailing 7-day window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_posts_per_week: Option<usize>,
}

impl CadenceRules {
    /// Rules enforcing only a minimum gap.
    pub fn min_gap(hours: i64) -> Self {
        Self {
            min_hours_between: Some(hours),
            max_posts_per_week: None,
        }
    }

    /// Rules enforcing only a weekly cap.
    pub fn weekly_cap(posts: usize) -> Self {
        Self {
            min_hours_between: None,
            max_posts_per_week: Some(posts),
        }
    }
}
