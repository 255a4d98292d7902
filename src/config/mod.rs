//! Project configuration: the per-directory override file and engine options.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    ClassesSection, EngineOptions, ExtensionSets, ExtensionsSection, FlagEntry, FlagsSection,
    ProjectConfig, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE,
};
