//! Foundational utilities shared across perk crates.
//!
//! Provides the pacing controller, account/schedule configuration, and the
//! time helpers used by the runtime and scheduler.

pub mod config;
pub mod pacing;
pub mod time_utils;

pub use config::{AccountConfig, BotConfig, ScheduleEntry, ServiceConfig};
pub use pacing::Pacer;
pub use time_utils::{current_unix_timestamp_ms, local_day_of_month};
