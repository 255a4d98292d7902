//! Compiler flag resolution for code-completion and analysis tools.
//!
//! Given a source or header file, finds the nearest compilation database and
//! project config above it, and turns the recorded compile command into the
//! flags a tooling client should parse the file with.

pub mod config;
pub mod flags;
pub mod logging;
pub mod paths;
pub mod project;
pub mod resolver;

pub use resolver::{FailureKind, FlagsResponse, ResolveError, ResolvedFlags, Resolver};
