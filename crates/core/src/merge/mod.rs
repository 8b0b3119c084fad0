//! Incremental merging of generated declarations into existing output files.
//!
//! Everything in this module is a pure function of its arguments: no I/O, no
//! logging. The [`crate::writer`] owns reading and writing the files.

pub mod api_file;
pub mod conflict;
pub mod rename;
pub mod scanner;
pub mod types_file;

use regex::Regex;

pub use api_file::{ApiMerge, imported_types, merge_api};
pub use conflict::{Resolution, resolve_conflict};
pub use rename::{Affix, RenameMap, apply_prefix, apply_suffix, rename_with};
pub use scanner::{Declaration, DeclarationKind, declared_names, extract_declarations, function_names};
pub use types_file::{TypeMerge, merge_types};

/// Compile a pattern that is a literal in this crate.
#[allow(clippy::expect_used)]
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern must compile")
}
