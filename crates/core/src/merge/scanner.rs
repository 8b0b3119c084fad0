//! Text-level discovery of exported declarations.
//!
//! This is a heuristic scanner for generator-produced TypeScript, not a parser:
//! braces are counted without regard to string literals or comments.

use regex::Regex;
use std::sync::LazyLock;

use super::compile;

static DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"export\s+(interface|type)\s+(\w+)"));

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| compile(r"export\s+function\s+(\w+)\s*\("));

/// The declaring keyword of a [`Declaration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
}

/// One exported `interface` or `type` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// Source text from the `export` keyword to the balanced close.
    pub body: String,
}

/// Every name introduced by `export interface X` / `export type X`, in order.
pub fn declared_names(text: &str) -> Vec<String> {
    DECLARATION
        .captures_iter(text)
        .map(|caps| caps[2].to_string())
        .collect()
}

/// Every name introduced by `export function x(`, in order.
pub fn function_names(text: &str) -> Vec<String> {
    FUNCTION
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Split `text` into complete declaration blocks.
///
/// A block starts at a declaring keyword and keeps going until the brace
/// depth returns to zero. A block whose first line is balanced and contains
/// `=` (a one-line type alias) ends with that line. Text between blocks is
/// dropped. A block that never closes runs to the end of the text, or to the
/// next declaration found at depth zero.
pub fn extract_declarations(text: &str) -> Vec<Declaration> {
    let starts: Vec<_> = DECLARATION.captures_iter(text).collect();
    let mut declarations = Vec::with_capacity(starts.len());
    let mut consumed = 0;

    for (index, caps) in starts.iter().enumerate() {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() < consumed {
            // Nested inside the previous block's braces.
            continue;
        }
        let limit = starts
            .iter()
            .skip(index + 1)
            .filter_map(|next| next.get(0))
            .map(|next| next.start())
            .next()
            .unwrap_or(text.len());

        let end = block_end(text, whole.start(), limit);
        consumed = end;

        let kind = if &caps[1] == "interface" {
            DeclarationKind::Interface
        } else {
            DeclarationKind::TypeAlias
        };
        declarations.push(Declaration {
            name: caps[2].to_string(),
            kind,
            body: text[whole.start()..end].trim_end().to_string(),
        });
    }

    declarations
}

/// Find the byte offset where the block starting at `start` ends.
///
/// `next_start` is where the following declaration begins; the block may run
/// past it only while braces are still open.
fn block_end(text: &str, start: usize, next_start: usize) -> usize {
    let mut depth: i64 = 0;
    let mut opened = false;
    let mut saw_assign = false;

    for (offset, ch) in text[start..].char_indices() {
        let pos = start + offset;
        if depth <= 0 && pos >= next_start && pos > start {
            return pos;
        }
        match ch {
            '{' => {
                depth += 1;
                opened = true;
            }
            '}' => {
                depth -= 1;
                if opened && depth <= 0 {
                    return include_semicolon(text, pos + 1);
                }
            }
            '=' => saw_assign = true,
            '\n' if depth <= 0 && !opened && saw_assign => return pos,
            _ => {}
        }
    }

    text.len()
}

/// Extend past a `;` that directly follows a closing brace (`type X = {..};`).
fn include_semicolon(text: &str, pos: usize) -> usize {
    if text[pos..].starts_with(';') {
        pos + 1
    } else {
        pos
    }
}
