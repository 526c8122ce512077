// tests/mod.rs
//! Test suite organization for notion-blocks
//!
//! Unit tests live next to the code they cover; this target holds the
//! integration tests and their recorded fixtures.

#[cfg(test)]
pub mod integration;
