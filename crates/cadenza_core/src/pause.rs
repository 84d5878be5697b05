//! The global publish gate's shared state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Singleton pause state consulted by every executor run.
///
/// Written only by the pause/resume operations; read fresh at dispatch
/// time, never cached from schedule time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseState {
    /// Whether publishing is globally held
    pub is_paused: bool,
    /// Who set the current pause
    pub paused_by: Option<String>,
    /// When the current pause began
    pub paused_at: Option<DateTime<Utc>>,
    /// Whether clearing the pause requires a two-step confirmation
    pub resume_requires_confirmation: bool,
}

impl PauseState {
    /// Create an unpaused state with the given resume policy.
    pub fn new(resume_requires_confirmation: bool) -> Self {
        Self {
            is_paused: false,
            paused_by: None,
            paused_at: None,
            resume_requires_confirmation,
        }
    }

    /// Engage the pause.
    pub fn pause(&mut self, by: impl Into<String>) {
        self.is_paused = true;
        self.paused_by = Some(by.into());
        self.paused_at = Some(Utc::now());
    }

    /// Clear the pause.
    pub fn resume(&mut self) {
        self.is_paused = false;
        self.paused_by = None;
        self.paused_at = None;
    }
}

impl Default for PauseState {
    fn default() -> Self {
        Self::new(false)
    }
}
