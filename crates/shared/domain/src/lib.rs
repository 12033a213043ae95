//! # Domain Models
//!
//! Pure domain types with minimal dependencies (`serde`, `thiserror`).
//! Keep it lean: no I/O or networking, only data and small helpers.

pub mod config;
pub mod constants;
pub mod factors;
pub mod registry;
