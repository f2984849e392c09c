//! CLI integration tests.
//!
//! Each test binds a stub interpreter (a POSIX shell script answering the
//! version and module probes) into an isolated install path.

#![cfg(unix)]

mod bind_tests;
mod common;
mod env_tests;
