//! Lightweight in-process metrics (dependency-free).
//!
//! Exchange counters, an in-flight gauge, and a duration histogram, stored as
//! atomics and rendered by the `/metrics` handler.

pub mod metrics;
