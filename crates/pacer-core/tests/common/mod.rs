//! Shared helpers for integration tests.
#![allow(dead_code)]

pub mod script_server;
pub mod scripted;
