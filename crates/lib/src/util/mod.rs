//! Shared utilities.
//!
//! Filesystem copy helpers used by package materialization, and test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
