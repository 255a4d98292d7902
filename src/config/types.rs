use serde::{Deserialize, Serialize};

use crate::flags::FlagToken;

/// Default file name of the compilation database.
pub const DEFAULT_DATABASE_FILE: &str = "compile_commands.json";

/// Default file name of the per-project override file.
pub const DEFAULT_CONFIG_FILE: &str = ".flagscope.toml";

/// Per-project override document.
///
/// One instance per directory containing a config file; immutable after load
/// and shared by every query under that directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub flags: Option<FlagsSection>,
    #[serde(default)]
    pub extensions: Option<ExtensionsSection>,
    #[serde(default)]
    pub classes: Option<ClassesSection>,
}

/// `[flags]` — flags added to or removed from every resolved list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagsSection {
    /// Appended after filtering, in order.
    #[serde(default)]
    pub add: Option<Vec<FlagEntry>>,
    /// Dropped wherever they occur.
    #[serde(default)]
    pub remove: Option<Vec<FlagEntry>>,
}

/// `[extensions]` — override the header/source classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionsSection {
    #[serde(default)]
    pub header: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<Vec<String>>,
}

/// `[classes]` — extend the builtin flag classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassesSection {
    /// Extra spellings stripped unconditionally.
    #[serde(default)]
    pub useless: Vec<String>,
}

/// A config flag entry: a plain flag, or a `[flag, value]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagEntry {
    Flag(String),
    Pair(String, String),
}

impl FlagEntry {
    /// Token appended for this entry by `flags.add`.
    pub fn to_token(&self) -> FlagToken {
        match self {
            Self::Flag(text) => FlagToken::bare(text.as_str()),
            Self::Pair(flag, value) => FlagToken::with_value(flag.as_str(), value.as_str()),
        }
    }

    /// Whether a `flags.remove` entry targets this token.
    ///
    /// A plain entry matches a bare token with the same text, any valued token
    /// with that spelling, and any valued token whose joined form equals it.
    /// A pair entry matches only the identical flag and value.
    pub fn matches(&self, token: &FlagToken) -> bool {
        match (self, token) {
            (Self::Flag(text), FlagToken::Bare(bare)) => text == bare,
            (Self::Flag(text), FlagToken::WithValue { flag, value }) => {
                text == flag
                    || text
                        .strip_prefix(flag.as_str())
                        .is_some_and(|rest| rest == value)
            }
            (Self::Pair(..), FlagToken::Bare(_)) => false,
            (Self::Pair(want_flag, want_value), FlagToken::WithValue { flag, value }) => {
                want_flag == flag && want_value == value
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Flag(text) => text.is_empty(),
            Self::Pair(flag, _) => flag.is_empty(),
        }
    }
}

/// Header/source extension sets used to classify a query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSets {
    pub header: Vec<String>,
    pub source: Vec<String>,
}

impl ExtensionSets {
    pub fn header_defaults() -> Vec<String> {
        [".h", ".hxx", ".hpp", ".hh"].map(String::from).to_vec()
    }

    pub fn source_defaults() -> Vec<String> {
        [".cpp", ".cxx", ".cc", ".c", ".m", ".mm"]
            .map(String::from)
            .to_vec()
    }
}

impl Default for ExtensionSets {
    fn default() -> Self {
        Self {
            header: Self::header_defaults(),
            source: Self::source_defaults(),
        }
    }
}

impl ProjectConfig {
    /// Extension sets with any `[extensions]` overrides applied.
    pub fn extension_sets(&self) -> ExtensionSets {
        let overrides = self.extensions.clone().unwrap_or_default();
        ExtensionSets {
            header: overrides.header.unwrap_or_else(ExtensionSets::header_defaults),
            source: overrides.source.unwrap_or_else(ExtensionSets::source_defaults),
        }
    }

    /// Extra useless spellings from `[classes]`.
    pub fn extra_useless(&self) -> &[String] {
        self.classes
            .as_ref()
            .map(|c| c.useless.as_slice())
            .unwrap_or(&[])
    }

    /// All add/remove entries, for validation.
    pub(crate) fn flag_entries(&self) -> impl Iterator<Item = &FlagEntry> {
        self.flags.iter().flat_map(|f| {
            f.add
                .iter()
                .flatten()
                .chain(f.remove.iter().flatten())
        })
    }

    pub(crate) fn has_empty_flag_entry(&self) -> bool {
        self.flag_entries().any(FlagEntry::is_empty)
    }
}

/// Engine-level options: which files mark a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Compilation database file name (e.g., `compile_commands.json`).
    pub database_file: String,
    /// Project override file name (e.g., `.flagscope.toml`).
    pub config_file: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}
