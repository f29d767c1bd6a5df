//! Shared domain types for Lumen.
//!
//! This crate contains the core domain types used across the Lumen bot:
//! user profiles, flow session state, journal entries, aggregate reports,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod config;
pub mod entry;
pub mod error;
pub mod report;
pub mod session;
pub mod user;
