//! Flag transformer — the stages between tokenizing and the final flag list.
//!
//! Stages must run in this order:
//! 1. [`drop_useless`] — before config, so `remove` rules see simplified spellings.
//! 2. [`apply_config`] — before absolutization, so added flags get absolutized too.
//! 3. [`absolutize_paths`]
//! 4. [`flatten`]
//!
//! None of them reorder tokens.

use std::path::Path;

use crate::config::FlagsSection;
use crate::flags::registry::FlagClassSet;
use crate::flags::tokenizer::{tokenize, FlagToken, TokenizeError};
use crate::paths;

/// Remove every token whose spelling is in the useless set.
///
/// A `Bare` token written in joined form (`-oa.o`, as config `add` may
/// produce) is judged by its flag part.
pub fn drop_useless(tokens: Vec<FlagToken>, classes: &FlagClassSet) -> Vec<FlagToken> {
    tokens
        .into_iter()
        .filter(|t| {
            let joined_useless = match t {
                FlagToken::Bare(text) => classes
                    .split_joined(text)
                    .is_some_and(|(flag, _)| classes.is_useless(flag)),
                FlagToken::WithValue { .. } => false,
            };
            !joined_useless && !classes.is_useless(t.spelling())
        })
        .collect()
}

/// Apply `flags.remove` then `flags.add`.
///
/// Added tokens always land at the end, after all removal.
pub fn apply_config(tokens: Vec<FlagToken>, flags: Option<&FlagsSection>) -> Vec<FlagToken> {
    let Some(flags) = flags else {
        return tokens;
    };

    let mut tokens = match flags.remove.as_deref() {
        Some(remove) if !remove.is_empty() => tokens
            .into_iter()
            .filter(|t| !remove.iter().any(|entry| entry.matches(t)))
            .collect(),
        _ => tokens,
    };

    if let Some(add) = &flags.add {
        tokens.extend(add.iter().map(|entry| entry.to_token()));
    }

    tokens
}

/// Resolve relative values of path flags against `working_directory`.
///
/// Absolute values are left untouched. Without an absolute working directory
/// this is the identity.
pub fn absolutize_paths(
    tokens: Vec<FlagToken>,
    working_directory: Option<&Path>,
    classes: &FlagClassSet,
) -> Vec<FlagToken> {
    let Some(working_directory) = working_directory.filter(|dir| dir.is_absolute()) else {
        return tokens;
    };

    tokens
        .into_iter()
        .map(|token| match token {
            FlagToken::WithValue { flag, value }
                if classes.is_path(&flag)
                    && !value.is_empty()
                    && !Path::new(&value).is_absolute() =>
            {
                let resolved = paths::absolutize(working_directory, Path::new(&value));
                FlagToken::WithValue {
                    flag,
                    value: resolved.to_string_lossy().into_owned(),
                }
            }
            other => other,
        })
        .collect()
}

/// Convert tokens back to a flat argument list.
///
/// Squash flags become one `flag+value` argument; other valued tokens become
/// two consecutive arguments.
pub fn flatten(tokens: &[FlagToken], classes: &FlagClassSet) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            FlagToken::Bare(text) => out.push(text.clone()),
            FlagToken::WithValue { flag, value } if classes.is_squash(flag) => {
                out.push(format!("{flag}{value}"));
            }
            FlagToken::WithValue { flag, value } => {
                out.push(flag.clone());
                out.push(value.clone());
            }
        }
    }
    out
}

/// Builder running the stages in their fixed order.
#[derive(Debug, Clone)]
pub struct FlagPipeline<'a> {
    classes: &'a FlagClassSet,
    tokens: Vec<FlagToken>,
}

impl<'a> FlagPipeline<'a> {
    /// Start from raw arguments.
    pub fn tokenize<S: AsRef<str>>(
        raw_args: &[S],
        classes: &'a FlagClassSet,
    ) -> Result<Self, TokenizeError> {
        Ok(Self {
            classes,
            tokens: tokenize(raw_args, classes)?,
        })
    }

    /// Stage 1: drop useless flags.
    pub fn without_useless(mut self) -> Self {
        self.tokens = drop_useless(self.tokens, self.classes);
        self
    }

    /// Stage 2: apply project add/remove overrides.
    ///
    /// Added flags go through the useless filter too.
    pub fn with_config(mut self, flags: Option<&FlagsSection>) -> Self {
        self.tokens = drop_useless(apply_config(self.tokens, flags), self.classes);
        self
    }

    /// Stage 3: absolutize path values.
    pub fn absolutized(mut self, working_directory: Option<&Path>) -> Self {
        self.tokens = absolutize_paths(self.tokens, working_directory, self.classes);
        self
    }

    /// Stage 4: flatten into the final flag list.
    pub fn build(self) -> Vec<String> {
        flatten(&self.tokens, self.classes)
    }
}
