//! Compiler flag handling pipeline.
//!
//! ```text
//! raw argv → Tokenize → Drop useless → Apply config → Absolutize → Flatten
//! ```
//!
//! Each stage is a pure function over an ordered token list.

mod registry;
mod tokenizer;
mod transform;

pub use registry::{flag_registry, FlagClassSet, FlagDef, FlagForm};
pub use tokenizer::{tokenize, FlagToken, TokenizeError};
pub use transform::{absolutize_paths, apply_config, drop_useless, flatten, FlagPipeline};
