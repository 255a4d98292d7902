//! Directory-indexed cache of compilation databases and project configs.
//!
//! Populated lazily, never evicted. Once a directory maps to an index or a
//! config, that mapping holds for the lifetime of the cache.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::config::{ConfigError, EngineOptions, ProjectConfig};
use crate::project::database::{CompilationDatabase, CompilationIndex, DatabaseError};

/// Loader turning a database root directory into an index.
pub type IndexOpener =
    Box<dyn Fn(&Path) -> Result<Arc<dyn CompilationIndex>, DatabaseError> + Send + Sync>;

/// Errors that can occur while locating a project.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The project governing a query file.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Directory holding the compilation database.
    pub root: PathBuf,
    pub index: Arc<dyn CompilationIndex>,
    /// Nearest config at or above `root`, if any.
    pub config: Option<Arc<ProjectConfig>>,
}

#[derive(Default)]
struct CacheState {
    indexes: HashMap<PathBuf, Arc<dyn CompilationIndex>>,
    configs: HashMap<PathBuf, Option<Arc<ProjectConfig>>>,
}

/// Thread-safe project cache.
///
/// The whole locate path runs under one lock, so concurrent queries that
/// discover the same new root build exactly one index.
pub struct ProjectIndexCache {
    options: EngineOptions,
    opener: IndexOpener,
    state: Mutex<CacheState>,
}

impl ProjectIndexCache {
    /// Cache using the default file names and the JSON database loader.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Cache using custom file names and the JSON database loader.
    pub fn with_options(options: EngineOptions) -> Self {
        let file_name = options.database_file.clone();
        let opener: IndexOpener = Box::new(move |dir: &Path| {
            let database = CompilationDatabase::open(dir, &file_name)?;
            Ok(Arc::new(database) as Arc<dyn CompilationIndex>)
        });
        Self::with_opener(options, opener)
    }

    /// Cache with a custom index loader.
    pub fn with_opener(options: EngineOptions, opener: IndexOpener) -> Self {
        Self {
            options,
            opener,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Find the project governing `file`.
    ///
    /// Returns `Ok(None)` when `file` does not exist (no walk is attempted) or
    /// when no ancestor directory holds a database.
    pub fn locate(&self, file: &Path) -> Result<Option<ProjectEntry>, LocateError> {
        let canonical = match std::fs::canonicalize(file) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(path = %file.display(), error = %e, "Query path does not exist");
                return Ok(None);
            }
        };

        let mut state = self.state.lock();

        for dir in canonical.ancestors().skip(1) {
            tracing::trace!(dir = %dir.display(), "Searching for compilation database");

            if let Some(index) = state.indexes.get(dir) {
                return Ok(Some(ProjectEntry {
                    root: dir.to_path_buf(),
                    index: Arc::clone(index),
                    config: state.configs.get(dir).cloned().flatten(),
                }));
            }

            if dir.join(&self.options.database_file).is_file() {
                tracing::info!(root = %dir.display(), "Using compilation database directory");
                let index = (self.opener)(dir)?;
                let config = self.find_config(&mut state, dir)?;
                state.indexes.insert(dir.to_path_buf(), Arc::clone(&index));
                return Ok(Some(ProjectEntry {
                    root: dir.to_path_buf(),
                    index,
                    config,
                }));
            }
        }

        tracing::debug!(path = %canonical.display(), "No compilation database found");
        Ok(None)
    }

    /// Walk outward from `root` to the nearest config, caching every
    /// directory visited against the result.
    fn find_config(
        &self,
        state: &mut CacheState,
        root: &Path,
    ) -> Result<Option<Arc<ProjectConfig>>, ConfigError> {
        let mut visited = Vec::new();
        let mut found = None;

        for dir in root.ancestors() {
            if let Some(cached) = state.configs.get(dir) {
                found = cached.clone();
                break;
            }
            visited.push(dir.to_path_buf());

            let candidate = dir.join(&self.options.config_file);
            if candidate.is_file() {
                tracing::info!(path = %candidate.display(), "Found project config");
                found = Some(Arc::new(ProjectConfig::load_from(&candidate)?));
                break;
            }
        }

        for dir in visited {
            state.configs.insert(dir, found.clone());
        }
        Ok(found)
    }

    /// Number of database roots loaded so far.
    pub fn len(&self) -> usize {
        self.state.lock().indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached config mapping for `dir`: `None` if the directory was never
    /// visited, `Some(None)` if it is known to have no config.
    pub fn cached_config(&self, dir: &Path) -> Option<Option<Arc<ProjectConfig>>> {
        self.state.lock().configs.get(dir).cloned()
    }
}

impl Default for ProjectIndexCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProjectIndexCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ProjectIndexCache")
            .field("options", &self.options)
            .field("roots", &state.indexes.keys().collect::<Vec<_>>())
            .finish()
    }
}
