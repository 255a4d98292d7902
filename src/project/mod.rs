//! Project discovery: compilation databases, project configs and the
//! directory cache tying them to query files.

mod cache;
mod database;
mod headers;

pub use cache::{IndexOpener, LocateError, ProjectEntry, ProjectIndexCache};
pub use database::{
    split_command, CompilationDatabase, CompilationIndex, CompileCommand, DatabaseError,
};
pub use headers::{candidate_sources, classify, FileKind};
