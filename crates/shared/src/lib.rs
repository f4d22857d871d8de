//! Shared utilities for the Masjid Screens backend.
//!
//! This crate provides common functionality used across all other crates:
//! - API key generation and fingerprinting
//! - JWT session validation for admin users

pub mod crypto;
pub mod jwt;
