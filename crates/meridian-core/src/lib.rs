//! Core configuration, error taxonomy, and timezone engine for meridian.
//!
//! Everything in this crate is synchronous and free of I/O; the web layer
//! lives in `meridian-app`.

pub mod config;
pub mod constants;
pub mod error;
pub mod tz;
