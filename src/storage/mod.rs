//! Whole-collection persistence over a local key-value store.
//!
//! Four fixed keys hold JSON blobs for metrics, goals, categories and
//! settings. There is no schema versioning; changing the wire shape of an
//! entity is a breaking change for existing on-device data.

pub mod entities;
pub mod facade;
pub mod kv;
