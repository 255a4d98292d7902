//! Flag registry — single source of truth for how compiler flags are tokenized.

use std::collections::BTreeSet;

/// How a flag carries its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagForm {
    /// Value is always the following argument (e.g., `-o out.o`).
    Separate,
    /// Value is glued to the spelling or given as the following argument
    /// (e.g., `-Ifoo` or `-I foo`).
    JoinedOrSeparate,
    /// Value is only ever glued to the spelling (e.g., `--sysroot=/opt/sdk`).
    Joined,
}

/// A single flag definition.
#[derive(Debug, Clone)]
pub struct FlagDef {
    /// Exact spelling, including any trailing `=`.
    pub spelling: &'static str,
    /// How the value is attached.
    pub form: FlagForm,
    /// Value is a filesystem path eligible for absolutization.
    pub path: bool,
    /// Flag and value are re-joined into one argument on output.
    pub squash: bool,
    /// Only meaningful when producing build artifacts; stripped unconditionally.
    pub useless: bool,
}

impl FlagDef {
    const fn value(spelling: &'static str) -> Self {
        Self {
            spelling,
            form: FlagForm::Separate,
            path: false,
            squash: false,
            useless: false,
        }
    }

    const fn include_dir(spelling: &'static str) -> Self {
        Self {
            spelling,
            form: FlagForm::JoinedOrSeparate,
            path: true,
            squash: true,
            useless: false,
        }
    }

    const fn separate_path(spelling: &'static str) -> Self {
        Self {
            spelling,
            form: FlagForm::Separate,
            path: true,
            squash: false,
            useless: false,
        }
    }

    const fn macro_def(spelling: &'static str) -> Self {
        Self {
            spelling,
            form: FlagForm::JoinedOrSeparate,
            path: false,
            squash: true,
            useless: false,
        }
    }

    const fn artifact(spelling: &'static str) -> Self {
        Self {
            spelling,
            form: FlagForm::JoinedOrSeparate,
            path: false,
            squash: false,
            useless: true,
        }
    }

    /// Whether the joined form (`<spelling><value>`) is accepted.
    pub fn accepts_joined(&self) -> bool {
        matches!(self.form, FlagForm::Joined | FlagForm::JoinedOrSeparate)
    }

    /// Whether the split form (`<spelling>`, `<value>`) is accepted.
    pub fn accepts_separate(&self) -> bool {
        matches!(self.form, FlagForm::Separate | FlagForm::JoinedOrSeparate)
    }
}

/// Build the complete flag registry.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        // === Build-artifact flags (dropped) ===
        FlagDef::artifact("-o"),
        FlagDef::artifact("-MF"),
        FlagDef::artifact("-MT"),
        FlagDef::artifact("-MQ"),
        // === Search-path flags (absolutized, squashed) ===
        FlagDef::include_dir("-I"),
        FlagDef::include_dir("-isystem"),
        FlagDef::include_dir("-iquote"),
        FlagDef::include_dir("-idirafter"),
        FlagDef::include_dir("-L"),
        FlagDef::include_dir("-F"),
        FlagDef {
            spelling: "--sysroot=",
            form: FlagForm::Joined,
            path: true,
            squash: true,
            useless: false,
        },
        // === Path-valued flags kept as two arguments ===
        FlagDef::separate_path("--sysroot"),
        FlagDef::separate_path("-isysroot"),
        FlagDef::separate_path("-include"),
        FlagDef::separate_path("-imacros"),
        // === Other value-taking flags ===
        FlagDef::value("-x"),
        FlagDef::macro_def("-D"),
        FlagDef::macro_def("-U"),
        FlagDef::value("-Xclang"),
        FlagDef::value("-target"),
        FlagDef::value("-arch"),
    ]
}

/// Spellings that never take a value but are dropped all the same.
const USELESS_SWITCHES: &[&str] = &["-MD", "-MMD"];

/// Immutable flag classification, built once from the registry and any
/// project overrides, then passed by reference through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagClassSet {
    multi_arg: BTreeSet<String>,
    path: BTreeSet<String>,
    squash: BTreeSet<String>,
    useless: BTreeSet<String>,
    /// Flags accepted in joined form, longest spelling first.
    joined: Vec<String>,
}

impl FlagClassSet {
    /// Classification derived from the builtin registry.
    pub fn builtin() -> Self {
        Self::from_registry(&flag_registry())
    }

    /// Build the class sets from an arbitrary registry.
    pub fn from_registry(registry: &[FlagDef]) -> Self {
        let mut multi_arg = BTreeSet::new();
        let mut path = BTreeSet::new();
        let mut squash = BTreeSet::new();
        let mut useless: BTreeSet<String> =
            USELESS_SWITCHES.iter().map(|s| s.to_string()).collect();
        let mut joined = Vec::new();

        for def in registry {
            if def.accepts_separate() {
                multi_arg.insert(def.spelling.to_string());
            }
            if def.accepts_joined() {
                joined.push(def.spelling.to_string());
            }
            if def.path {
                path.insert(def.spelling.to_string());
            }
            if def.squash {
                squash.insert(def.spelling.to_string());
            }
            if def.useless {
                useless.insert(def.spelling.to_string());
            }
        }

        // Longest first so `-isystem` wins over any shorter prefix.
        joined.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            multi_arg,
            path,
            squash,
            useless,
            joined,
        }
    }

    /// Add extra spellings to the useless set.
    pub fn with_useless<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.useless.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn is_multi_arg(&self, flag: &str) -> bool {
        self.multi_arg.contains(flag)
    }

    pub fn is_path(&self, flag: &str) -> bool {
        self.path.contains(flag)
    }

    pub fn is_squash(&self, flag: &str) -> bool {
        self.squash.contains(flag)
    }

    pub fn is_useless(&self, flag: &str) -> bool {
        self.useless.contains(flag)
    }

    pub fn path_flags(&self) -> impl Iterator<Item = &str> {
        self.path.iter().map(String::as_str)
    }

    pub fn squash_flags(&self) -> impl Iterator<Item = &str> {
        self.squash.iter().map(String::as_str)
    }

    /// Split a joined flag (`-Ifoo`, `-DFOO`) into its spelling and value.
    ///
    /// Returns `None` unless `arg` starts with a joinable spelling followed by
    /// a non-empty value.
    pub fn split_joined<'a>(&self, arg: &'a str) -> Option<(&'a str, &'a str)> {
        self.joined.iter().find_map(|spelling| {
            let value = arg.strip_prefix(spelling.as_str())?;
            if value.is_empty() {
                return None;
            }
            Some(arg.split_at(spelling.len()))
        })
    }
}

impl Default for FlagClassSet {
    fn default() -> Self {
        Self::builtin()
    }
}
