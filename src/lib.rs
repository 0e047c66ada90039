//! Core library for the `trafficgen` CLI.
//!
//! The generator keeps a target service busy with a weighted random mix of
//! GET/POST/DELETE requests. Each batch launches a fixed number of requests
//! concurrently and waits for all of them before pausing and starting the
//! next. Per-method success/failure counters feed periodic and final
//! statistics reports. The binary runs until SIGINT or SIGTERM.
pub mod args;
pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod system;
