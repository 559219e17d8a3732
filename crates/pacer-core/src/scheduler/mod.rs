//! Cooldown-aware job scheduler.
//!
//! A [`Scheduler`] holds [`JobGroup`]s, each holding [`Job`]s. Selection is
//! fair and skips anything still cooling down; [`run_loop`] drives it.

mod error;
mod group;
mod job;
mod run;
mod select;

pub use error::SchedulerError;
pub use group::JobGroup;
pub use job::{FnWork, Job, Work};
pub use run::run_loop;
pub use select::{Scheduler, DEFAULT_POLL_INTERVAL};
