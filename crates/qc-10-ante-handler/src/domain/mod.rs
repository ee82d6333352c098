//! # Domain Layer
//!
//! Transaction shape, gas accounting and errors; no store access.

pub mod config;
pub mod context;
pub mod errors;
pub mod gas;
pub mod tx;
