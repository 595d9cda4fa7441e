//! Shared test utilities for kubeorg integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with temp source/destination trees
//! - Small manifest builders

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
