//! pkgbind-lib: Core types and logic for pkgbind
//!
//! This crate binds an interpreter that is already installed on the host as a
//! versioned, relocatable package:
//! - `locate`: find the interpreter executable
//! - `version`: extract its version and gate it against an accepted range
//! - `introspect`: discover where its builtin modules live
//! - `package`: materialize the package inside an all-or-nothing transaction
//! - `activate`: evaluate a stored package's environment commands
//! - `bind`: the end-to-end binding workflow

pub mod activate;
pub mod bind;
pub mod consts;
pub mod introspect;
pub mod locate;
pub mod package;
pub mod platform;
pub mod process;
pub mod shell;
pub mod util;
pub mod version;
