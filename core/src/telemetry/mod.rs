//! telemetry/mod.rs
//! Channel counters. Snapshots are plain clones: `Channel::telemetry` hands
//! out a copy so callers never observe a half-updated set.

pub mod counters;

pub use counters::*;
