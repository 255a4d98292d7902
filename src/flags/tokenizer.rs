//! Flag tokenizer — raw argument vector → typed flag tokens.

use thiserror::Error;

use crate::flags::registry::FlagClassSet;

/// A single compiler flag, optionally carrying one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagToken {
    /// Flag (or positional argument) with no associated value.
    Bare(String),
    /// Flag that carries exactly one argument, e.g. an include directory.
    WithValue { flag: String, value: String },
}

impl FlagToken {
    pub fn bare(text: impl Into<String>) -> Self {
        Self::Bare(text.into())
    }

    pub fn with_value(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::WithValue {
            flag: flag.into(),
            value: value.into(),
        }
    }

    /// The flag spelling: the whole text for `Bare`, the flag part otherwise.
    pub fn spelling(&self) -> &str {
        match self {
            Self::Bare(text) => text,
            Self::WithValue { flag, .. } => flag,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::WithValue { value, .. } => Some(value),
        }
    }
}

/// Errors produced while tokenizing a raw argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A value-taking flag was the last argument.
    #[error("flag '{flag}' expects a value but is the last argument")]
    MalformedFlagSequence { flag: String },
}

/// Tokenize raw compiler arguments against the flag classes.
///
/// Joined flags (`-Ifoo`) are recognised before split ones (`-I foo`),
/// so a joined argument is never split further. Argument order is preserved.
pub fn tokenize<S: AsRef<str>>(
    raw_args: &[S],
    classes: &FlagClassSet,
) -> Result<Vec<FlagToken>, TokenizeError> {
    let mut tokens = Vec::with_capacity(raw_args.len());
    let mut iter = raw_args.iter().map(AsRef::as_ref);

    while let Some(arg) = iter.next() {
        if let Some((flag, value)) = classes.split_joined(arg) {
            tokens.push(FlagToken::with_value(flag, value));
        } else if classes.is_multi_arg(arg) {
            let Some(value) = iter.next() else {
                return Err(TokenizeError::MalformedFlagSequence {
                    flag: arg.to_string(),
                });
            };
            tokens.push(FlagToken::with_value(arg, value));
        } else {
            tokens.push(FlagToken::bare(arg));
        }
    }

    Ok(tokens)
}
