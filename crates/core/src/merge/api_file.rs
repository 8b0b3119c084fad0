//! Merging a generated request function into an existing `api.ts`.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

use super::compile;
use super::scanner::function_names;

static TYPE_IMPORT_LIST: LazyLock<Regex> =
    LazyLock::new(|| compile(r"import\s+type\s+\{\s*([^}]+)\s*\}"));

static TYPE_IMPORT_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"import\s+type\s+\{[^}]+\}\s+from\s+"\./types";"#));

static FUNCTION_START: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)export\s+function.+"));

/// Result of [`merge_api`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMerge {
    pub merged: String,
    /// A function with the same name already exists; `merged` is unchanged.
    pub is_duplicate: bool,
}

/// Type names listed in the first `import type { ... }` header.
pub fn imported_types(text: &str) -> Vec<String> {
    TYPE_IMPORT_LIST
        .captures(text)
        .map(|caps| {
            caps[1]
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn type_import_statement(types: &[String]) -> String {
    format!("import type {{ {} }} from \"./types\";", types.join(", "))
}

/// Merge the single function in `new_content` into `existing`.
///
/// Functions are matched by name only: if `function_name` is already
/// exported the new body is discarded. Otherwise the type import list is
/// widened to the union of both files (existing order first) and the new
/// function is appended after a blank line.
pub fn merge_api(existing: &str, new_content: &str, function_name: &str) -> ApiMerge {
    if existing.trim().is_empty() {
        return ApiMerge {
            merged: new_content.to_string(),
            is_duplicate: false,
        };
    }

    if function_names(existing).iter().any(|name| name == function_name) {
        return ApiMerge {
            merged: existing.to_string(),
            is_duplicate: true,
        };
    }

    let existing_types = imported_types(existing);
    let mut all_types = existing_types.clone();
    for name in imported_types(new_content) {
        if !all_types.contains(&name) {
            all_types.push(name);
        }
    }

    let mut merged = existing.to_string();
    if all_types.len() > existing_types.len() {
        let statement = type_import_statement(&all_types);
        if TYPE_IMPORT_STATEMENT.is_match(&merged) {
            merged = TYPE_IMPORT_STATEMENT
                .replacen(&merged, 1, NoExpand(&statement))
                .into_owned();
        } else {
            merged = insert_after_imports(&merged, &statement);
        }
    }

    if let Some(function) = FUNCTION_START.find(new_content) {
        merged = format!("{}\n\n{}", merged.trim(), function.as_str());
    }

    ApiMerge {
        merged,
        is_duplicate: false,
    }
}

/// Insert `line` after the leading block of `import` lines (or at the top).
fn insert_after_imports(content: &str, line: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let position = lines
        .iter()
        .take_while(|l| l.trim().is_empty() || l.trim_start().starts_with("import "))
        .enumerate()
        .filter(|(_, l)| l.trim_start().starts_with("import "))
        .map(|(index, _)| index + 1)
        .last()
        .unwrap_or(0);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..position]);
    out.push(line);
    out.extend_from_slice(&lines[position..]);
    out.join("\n")
}
