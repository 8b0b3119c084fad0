//! Merging a freshly generated declaration blob into an existing `types.ts`.

use super::conflict::resolve_conflict;
use super::rename::{Affix, RenameMap, rename_with};
use super::scanner::{declared_names, extract_declarations};

/// Result of [`merge_types`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMerge {
    /// Full file content to persist.
    pub merged: String,
    /// Nothing new was added; `merged` equals the existing content.
    pub is_duplicate: bool,
    /// The requested top-level name was taken and the blob was renamed.
    pub has_conflict: bool,
    /// Top-level name to reference from generated code.
    pub final_type_name: String,
    /// New names of every declaration renamed by the cascade.
    pub renamed_types: Vec<String>,
    /// Old to new names applied to the blob. Empty without a conflict.
    pub renames: RenameMap,
}

/// Merge `new_blob` into `existing`, using `type_name` as the top-level name.
///
/// When `type_name` already exists, every declaration in `new_blob` gets the
/// same numeric suffix so references inside the blob stay consistent. New
/// declarations whose (possibly renamed) name is already present are dropped
/// without comparing bodies; the existing text is never rewritten, only
/// appended to.
pub fn merge_types(existing: &str, new_blob: &str, type_name: &str) -> TypeMerge {
    if existing.trim().is_empty() {
        return TypeMerge {
            merged: new_blob.to_string(),
            is_duplicate: false,
            has_conflict: false,
            final_type_name: type_name.to_string(),
            renamed_types: Vec::new(),
            renames: RenameMap::default(),
        };
    }

    let existing_names = declared_names(existing);
    let resolution = resolve_conflict(&existing_names, type_name);

    let (processed, renames) = if resolution.renamed {
        let suffix = resolution.suffix.to_string();
        rename_with(new_blob, Affix::Suffix(&suffix))
    } else {
        (new_blob.to_string(), RenameMap::default())
    };

    let unique: Vec<String> = extract_declarations(&processed)
        .into_iter()
        .filter(|decl| !existing_names.contains(&decl.name))
        .map(|decl| decl.body)
        .collect();

    if unique.is_empty() {
        return TypeMerge {
            merged: existing.to_string(),
            is_duplicate: true,
            has_conflict: resolution.renamed,
            final_type_name: resolution.name,
            renamed_types: Vec::new(),
            renames,
        };
    }

    let merged = format!("{}\n\n{}", existing.trim(), unique.join("\n\n"));

    TypeMerge {
        merged,
        is_duplicate: false,
        has_conflict: resolution.renamed,
        final_type_name: resolution.name,
        renamed_types: renames.new_names(),
        renames,
    }
}
