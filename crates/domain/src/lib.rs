//! Domain layer for the Masjid Screens backend.
//!
//! This crate contains:
//! - Domain models (Masjid, Screen, ContentSchedule, ContentItem)
//! - Pure business logic (pairing codes, liveness, schedule resolution)

pub mod models;
pub mod services;
