//! Unit tests for the tfctl CLI
//!
//! These tests use mocked dependencies and run fast without spawning
//! Terraform.

mod dispatch_service;
mod doctor_service;
mod property_tests;
