//! Shared utilities for advisor-rs
//!
//! This crate provides common functionality used across the advisor-rs workspace,
//! currently the tracing subscriber setup shared by every binary.

pub mod logging;

pub use logging::{LogFormat, init_tracing};
