//! Property-based tests for the connection pool.
//!
//! Run with: cargo test --test property_tests
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold across pool sizes and failure patterns.

pub mod pool;
