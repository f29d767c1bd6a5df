//! Business logic and repository trait definitions for Lumen.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the pure engines: safety guard,
//! per-user session store, flow state machines, aggregation, and the
//! dispatch router. It depends only on `lumen-types` -- never on
//! `lumen-infra` or any database/HTTP crate.

pub mod aggregate;
pub mod dispatch;
pub mod flow;
pub mod generative;
pub mod i18n;
pub mod repository;
pub mod safety;
pub mod session;
