// tests/integration/mod.rs
//! Integration tests for notion-blocks
//!
//! These drive the public client against recorded record maps, both through
//! an in-memory transport and through the HTTP transport against a local
//! mock server.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod identifier_normalization;

#[cfg(test)]
mod resolver_flow;

#[cfg(test)]
mod http_transport;
