//! Shared test utilities for wfits integration tests.
//!
//! This module provides:
//! - `TestHarness` with an on-disk database in a temp directory
//! - Builders for items and wizard steps, plus recording hooks

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
