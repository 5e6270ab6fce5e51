//! # nota-core
//!
//! Foundational types shared across the nota crates:
//! - [`RunReport`], the per-run counters reported upward after a delivery run
//! - Case-insensitive file extension matching used by every stage
//! - A runtime-independent polling primitive ([`poll::poll_until`]) with a
//!   pluggable [`poll::Clock`] so waits can be driven by a virtual clock in tests

pub mod files;
pub mod poll;
pub mod report;

pub use files::has_extension;
pub use poll::{Backoff, Clock, ManualClock, PollError, SystemClock, poll_until};
pub use report::RunReport;
