//! CLI command handlers, one file per subcommand.

mod completions;
mod run;
mod sources;
mod stats;
mod status;

pub use completions::run_completions;
pub use run::run_scheduler;
pub use sources::run_sources;
pub use stats::run_stats;
pub use status::run_status;
