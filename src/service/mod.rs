//! Sweep drivers orchestrating the cleanup run
//!
//! One repository at a time, one tag at a time, deliberately sequential to
//! stay inside upstream rate limits and keep deletion ordering
//! predictable.

mod sweep;

pub use sweep::{sweep_ecr, sweep_registry, SweepReport};
