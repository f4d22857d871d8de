//! Business logic services.

pub mod schedule_resolution;
