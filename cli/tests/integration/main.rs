//! Integration tests for the tfctl CLI
//!
//! These tests spawn the actual binary against a temporary repository and a
//! fake `terraform` script. They are slower and should be run separately
//! from unit tests.

#![cfg(unix)]

mod repo_commands;
