//! Shared test utilities: throwaway project trees on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

/// A temporary directory tree standing in for a C/C++ project.
pub struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = fs::canonicalize(dir.path()).expect("Failed to canonicalize temp dir");
        Self { _dir: dir, root }
    }

    /// Canonical root of the tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Create an empty file (and its parents).
    pub fn touch(&self, rel: &str) -> PathBuf {
        self.write(rel, "")
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `<db_dir>/compile_commands.json`; entry files are created.
    pub fn compile_db(&self, db_dir: &str, entries: &[Entry]) -> PathBuf {
        let commands: Vec<_> = entries
            .iter()
            .map(|entry| {
                let file_path = self.path(&entry.file);
                if !file_path.exists() {
                    self.touch(&entry.file);
                }
                json!({
                    "directory": entry.directory,
                    "file": file_path,
                    "arguments": entry.arguments,
                })
            })
            .collect();
        let rel = format!("{db_dir}/compile_commands.json");
        self.write(
            rel.trim_start_matches('/'),
            &serde_json::to_string_pretty(&commands).unwrap(),
        )
    }

    /// Write `<dir>/.flagscope.toml`.
    pub fn config(&self, dir: &str, toml: &str) -> PathBuf {
        let rel = format!("{dir}/.flagscope.toml");
        self.write(rel.trim_start_matches('/'), toml)
    }
}

/// One compile command, relative to the project root.
pub struct Entry {
    file: String,
    directory: String,
    arguments: Vec<String>,
}

/// Compile command for `file` run in `directory`.
pub fn entry(file: &str, directory: &str, arguments: &[&str]) -> Entry {
    Entry {
        file: file.to_string(),
        directory: directory.to_string(),
        arguments: strings(arguments),
    }
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
