//! Consistent renaming of every declaration in a blob.
//!
//! Each declared name gets the same prefix or suffix, and every free-standing
//! reference to it (field types, array elements, union members, generic
//! arguments) is rewritten to match.

use regex::Regex;

use super::scanner::declared_names;

/// How a declared name is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix<'a> {
    Prefix(&'a str),
    Suffix(&'a str),
}

impl Affix<'_> {
    fn is_empty(&self) -> bool {
        match self {
            Affix::Prefix(s) | Affix::Suffix(s) => s.is_empty(),
        }
    }

    fn apply(&self, name: &str) -> String {
        match self {
            Affix::Prefix(prefix) => format!("{prefix}{name}"),
            Affix::Suffix(suffix) => format!("{name}{suffix}"),
        }
    }

    /// Whether the occurrence at `start..end` already carries this affix.
    fn already_applied(&self, text: &str, start: usize, end: usize) -> bool {
        match self {
            Affix::Prefix(prefix) => text[..start].ends_with(prefix),
            Affix::Suffix(suffix) => text[end..].starts_with(suffix),
        }
    }
}

/// Old declared name to new declared name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: Vec<(String, String)>,
}

impl RenameMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// New name for `old`, if it was renamed.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(from, _)| from == old)
            .map(|(_, to)| to.as_str())
    }

    /// `old` after renaming, or `old` itself when it was not part of the pass.
    pub fn resolve<'a>(&'a self, old: &'a str) -> &'a str {
        self.get(old).unwrap_or(old)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// The renamed names, in declaration order.
    pub fn new_names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, to)| to.clone()).collect()
    }
}

/// Prepend `prefix` to every declared name and its references.
///
/// Calling this twice with the same prefix yields a doubled prefix
/// (`TTFoo`); callers apply it once per generation.
pub fn apply_prefix(text: &str, prefix: &str) -> String {
    rename_with(text, Affix::Prefix(prefix)).0
}

/// Append `suffix` to every declared name and its references.
pub fn apply_suffix(text: &str, suffix: &str) -> String {
    rename_with(text, Affix::Suffix(suffix)).0
}

/// Rename every declaration in `text` with `affix`, returning the new text
/// and the map that was applied.
///
/// Names are processed longest first so that replacing a short name such as
/// `Data` can never touch the inside of an already rewritten `UserData`.
pub fn rename_with(text: &str, affix: Affix<'_>) -> (String, RenameMap) {
    if affix.is_empty() {
        return (text.to_string(), RenameMap::default());
    }

    let mut names = declared_names(text);
    let mut seen = std::collections::HashSet::new();
    names.retain(|name| seen.insert(name.clone()));

    let map = RenameMap {
        entries: names
            .iter()
            .map(|name| (name.clone(), affix.apply(name)))
            .collect(),
    };

    let mut ordered = names;
    ordered.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut result = text.to_string();
    for name in &ordered {
        let new_name = affix.apply(name);
        let escaped = regex::escape(name);

        if let Ok(declaring) = Regex::new(&format!(
            r"(export\s+(?:interface|type)\s+){escaped}\b"
        )) {
            result = declaring
                .replace_all(&result, format!("${{1}}{new_name}").as_str())
                .into_owned();
        }

        if let Ok(reference) = Regex::new(&format!(r"\b{escaped}\b")) {
            result = replace_references(&result, &reference, &new_name, affix);
        }
    }

    (result, map)
}

fn replace_references(text: &str, pattern: &Regex, new_name: &str, affix: Affix<'_>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if affix.already_applied(text, found.start(), found.end()) {
            continue;
        }
        out.push_str(&text[last..found.start()]);
        out.push_str(new_name);
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}
