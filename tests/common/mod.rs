// tests/common/mod.rs
//! Common test utilities for server integration tests.

pub mod fake_runner;

pub use fake_runner::FakeRunner;
