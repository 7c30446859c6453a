//! Integration test suite for amgctl
//!
//! End-to-end tests of the self-update pipeline against a fake release feed,
//! plus tests of the `amgctl` binary itself.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **upgrade**: The update pipeline through the library API
//! - **cli**: The `amgctl update` command as a subprocess

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod upgrade;
