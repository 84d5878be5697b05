//! Per-platform call budgets and workspace configuration.
//!
//! The [`PublishWindow`] tracks a rolling budget of recent publisher
//! calls per platform. It is pure bookkeeping: the executor consults it
//! immediately before dispatch, and a job that finds the window
//! exhausted stays queued for the next check cycle rather than failing.
//!
//! [`CadenzaConfig`] is the workspace TOML configuration, loaded with
//! bundled defaults and optional user overrides.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;

pub use config::{CadenceSection, CadenzaConfig, GateSection, PublishSection, RateLimitSection};
pub use limiter::PublishWindow;
