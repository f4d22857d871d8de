//! HTTP route handlers.

pub mod content_items;
pub mod device;
pub mod health;
pub mod pairing;
pub mod schedules;
pub mod screens;
