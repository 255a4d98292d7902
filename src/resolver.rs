//! Resolver — file path → final compiler flags.
//!
//! ```text
//! locate project → pick query file (header fallback) → lookup → flag pipeline
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, ProjectConfig};
use crate::flags::{FlagClassSet, FlagPipeline, TokenizeError};
use crate::paths;
use crate::project::{
    candidate_sources, classify, CompilationIndex, CompileCommand, DatabaseError, FileKind,
    LocateError, ProjectIndexCache,
};

/// Why a file could not be resolved to flags.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No enclosing directory holds a compilation database.
    #[error("No compilation database found for '{path}'")]
    NoProjectFound { path: PathBuf },

    /// The database has no entry for the file or any header fallback.
    #[error("No compile command for '{path}' in database at '{root}'")]
    NoCompileInfo { path: PathBuf, root: PathBuf },

    /// The database entry ends with a flag missing its value.
    #[error("Malformed compile command for '{path}': {source}")]
    MalformedFlagSequence {
        path: PathBuf,
        #[source]
        source: TokenizeError,
    },

    #[error("Invalid compilation database: {0}")]
    InvalidDatabase(#[from] DatabaseError),

    #[error("Invalid project config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<LocateError> for ResolveError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::Database(e) => Self::InvalidDatabase(e),
            LocateError::Config(e) => Self::InvalidConfig(e),
        }
    }
}

/// Failure kind, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoProjectFound,
    NoCompileInfo,
    MalformedFlagSequence,
    InvalidDatabase,
    InvalidConfig,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoProjectFound => "no_project_found",
            Self::NoCompileInfo => "no_compile_info",
            Self::MalformedFlagSequence => "malformed_flag_sequence",
            Self::InvalidDatabase => "invalid_database",
            Self::InvalidConfig => "invalid_config",
        }
    }
}

impl ResolveError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoProjectFound { .. } => FailureKind::NoProjectFound,
            Self::NoCompileInfo { .. } => FailureKind::NoCompileInfo,
            Self::MalformedFlagSequence { .. } => FailureKind::MalformedFlagSequence,
            Self::InvalidDatabase(_) => FailureKind::InvalidDatabase,
            Self::InvalidConfig(_) => FailureKind::InvalidConfig,
        }
    }
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFlags {
    /// Final flag list.
    pub flags: Vec<String>,
    /// The caller may cache this result.
    pub cacheable: bool,
    /// File whose database entry supplied the flags.
    pub source: PathBuf,
    /// Working directory reported for that entry.
    pub working_directory: PathBuf,
}

/// Host-facing response; failures become an empty, non-cacheable list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagsResponse {
    pub flags: Vec<String>,
    pub cacheable: bool,
}

impl From<ResolvedFlags> for FlagsResponse {
    fn from(resolved: ResolvedFlags) -> Self {
        Self {
            flags: resolved.flags,
            cacheable: resolved.cacheable,
        }
    }
}

/// Resolves compiler flags for files, backed by a project cache.
#[derive(Debug)]
pub struct Resolver {
    cache: ProjectIndexCache,
    classes: FlagClassSet,
}

impl Resolver {
    /// Resolver with the builtin flag classification.
    pub fn new(cache: ProjectIndexCache) -> Self {
        Self::with_classes(cache, FlagClassSet::builtin())
    }

    /// Resolver with a custom base flag classification.
    pub fn with_classes(cache: ProjectIndexCache, classes: FlagClassSet) -> Self {
        Self { cache, classes }
    }

    pub fn cache(&self) -> &ProjectIndexCache {
        &self.cache
    }

    /// Entry point for hosts: never fails.
    pub fn flags_for_file(&self, file: &Path) -> FlagsResponse {
        match self.resolve(file) {
            Ok(resolved) => resolved.into(),
            Err(e) => {
                tracing::warn!(
                    path = %file.display(),
                    kind = e.kind().as_str(),
                    error = %e,
                    "Failed to resolve compile flags"
                );
                FlagsResponse::default()
            }
        }
    }

    /// Resolve the flags for `file`.
    pub fn resolve(&self, file: &Path) -> Result<ResolvedFlags, ResolveError> {
        let Some(project) = self.cache.locate(file)? else {
            return Err(ResolveError::NoProjectFound {
                path: file.to_path_buf(),
            });
        };
        let config = project.config.as_deref();
        // Located files exist; relative queries resolve against the cwd.
        let query = paths::canonical_or_normalized(file);

        let Some((source, command)) = self.lookup(project.index.as_ref(), &query, config) else {
            return Err(ResolveError::NoCompileInfo {
                path: file.to_path_buf(),
                root: project.root,
            });
        };

        let classes = match config {
            Some(config) => self
                .classes
                .clone()
                .with_useless(config.extra_useless().iter().cloned()),
            None => self.classes.clone(),
        };
        let flags = FlagPipeline::tokenize(&command.arguments, &classes)
            .map_err(|e| ResolveError::MalformedFlagSequence {
                path: source.clone(),
                source: e,
            })?
            .without_useless()
            .with_config(config.and_then(|c| c.flags.as_ref()))
            .absolutized(Some(&command.directory))
            .build();

        tracing::debug!(
            path = %file.display(),
            source = %source.display(),
            working_directory = %command.directory.display(),
            raw = ?command.arguments,
            flags = ?flags,
            "Resolved compile flags"
        );

        Ok(ResolvedFlags {
            flags,
            cacheable: true,
            source,
            working_directory: command.directory,
        })
    }

    /// Pick the database entry for `file`: for headers, the first sibling
    /// source with flags; otherwise (or when none has flags) the file itself.
    fn lookup(
        &self,
        index: &dyn CompilationIndex,
        file: &Path,
        config: Option<&ProjectConfig>,
    ) -> Option<(PathBuf, CompileCommand)> {
        let sets = config.map(ProjectConfig::extension_sets).unwrap_or_default();
        let query = |path: PathBuf| {
            tracing::debug!(path = %path.display(), "Looking up compile command");
            index
                .lookup(&path)
                .filter(|cmd| !cmd.arguments.is_empty())
                .map(|cmd| (path, cmd))
        };

        if classify(file, &sets) == FileKind::Header {
            if let Some(found) = candidate_sources(file, &sets.source).find_map(&query) {
                return Some(found);
            }
        }

        query(file.to_path_buf())
    }
}
