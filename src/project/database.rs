//! JSON compilation database (`compile_commands.json`).
//!
//! An array of `{directory, file, command | arguments}` objects, indexed by
//! absolute file path.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::paths;

/// Raw argument vector and working directory for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    pub arguments: Vec<String>,
    pub directory: PathBuf,
}

/// Read-only table answering "how was this file compiled?".
pub trait CompilationIndex: fmt::Debug + Send + Sync {
    /// Compile command for `path`, if the index has one.
    fn lookup(&self, path: &Path) -> Option<CompileCommand>;
}

/// Errors that can occur when loading a compilation database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to read compilation database '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse compilation database '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid entry #{index} in compilation database '{path}': {message}")]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

/// In-memory compilation database rooted at one directory.
#[derive(Debug, Clone)]
pub struct CompilationDatabase {
    root: PathBuf,
    entries: HashMap<PathBuf, CompileCommand>,
}

impl CompilationDatabase {
    /// Load `<dir>/<file_name>`.
    pub fn open(dir: &Path, file_name: &str) -> Result<Self, DatabaseError> {
        let path = dir.join(file_name);
        let content = fs::read_to_string(&path).map_err(|e| DatabaseError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let database = Self::from_json(dir, &path, &content)?;
        tracing::info!(
            path = %path.display(),
            entries = database.len(),
            "Loaded compilation database"
        );
        Ok(database)
    }

    /// Parse database JSON. `source` is only used in error messages.
    pub fn from_json(root: &Path, source: &Path, content: &str) -> Result<Self, DatabaseError> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(content).map_err(|e| DatabaseError::ParseError {
                path: source.to_path_buf(),
                source: e,
            })?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            let arguments = match (entry.arguments, entry.command) {
                (Some(arguments), _) => arguments,
                (None, Some(command)) => split_command(&command),
                (None, None) => {
                    return Err(DatabaseError::InvalidEntry {
                        path: source.to_path_buf(),
                        index,
                        message: "entry has neither 'arguments' nor 'command'".to_string(),
                    })
                }
            };

            let directory = paths::absolutize(root, Path::new(&entry.directory));
            let file = paths::absolutize(&directory, Path::new(&entry.file));

            // First entry for a file wins.
            entries.entry(file).or_insert(CompileCommand {
                arguments,
                directory,
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompilationIndex for CompilationDatabase {
    fn lookup(&self, path: &Path) -> Option<CompileCommand> {
        let key = paths::absolutize(&self.root, path);
        self.entries.get(&key).cloned()
    }
}

/// Split a shell command line into arguments.
///
/// Handles single quotes, double quotes and backslash escapes; no expansion.
pub fn split_command(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut chars = input.chars();
    let mut in_word = false;
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                cur.push(ch);
            }
            continue;
        }
        if in_double {
            match ch {
                '"' => in_double = false,
                '\\' => match chars.next() {
                    Some(next @ ('"' | '\\' | '$' | '`')) => cur.push(next),
                    Some(next) => {
                        cur.push('\\');
                        cur.push(next);
                    }
                    None => cur.push('\\'),
                },
                _ => cur.push(ch),
            }
            continue;
        }
        match ch {
            '\'' => {
                in_single = true;
                in_word = true;
            }
            '"' => {
                in_double = true;
                in_word = true;
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    cur.push(next);
                }
                in_word = true;
            }
            c if c.is_whitespace() => {
                if in_word {
                    out.push(std::mem::take(&mut cur));
                    in_word = false;
                }
            }
            _ => {
                cur.push(ch);
                in_word = true;
            }
        }
    }
    if in_word {
        out.push(cur);
    }
    out
}
