//! Local-first tracker for personal performance metrics. Entries are logged
//! against categories, persisted as JSON blobs in a per-user directory, and
//! summarized into per-category trends over configurable time windows.
//!

pub mod analytics;
pub mod cli;
pub mod storage;
pub mod utils;
