pub mod config;
pub mod logging;

pub mod control;
pub mod http;
pub mod pipeline;
pub mod retry;
pub mod run_db;
pub mod scheduler;
pub mod sources;
