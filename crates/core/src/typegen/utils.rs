//! Identifier helpers shared by inference and emission.

/// Check if a property key has to be quoted in an interface body.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if needed.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Turn a JSON key into a declaration name: `user_profile` -> `UserProfile`.
///
/// Non-alphanumeric characters split words; a leading digit gets a `The`
/// prefix so the result is always a valid identifier.
pub fn type_name_from_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for word in key.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }

    if name.is_empty() {
        return "Type".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "The");
    }
    name
}

/// Name for the element type of an array stored under `name`.
///
/// Plural names are singularized (`Posts` -> `Post`, `Categories` ->
/// `Category`); anything else gets an `Element` suffix.
pub fn element_name(name: &str) -> String {
    let singular = singularize(name);
    if singular == name {
        format!("{name}Element")
    } else {
        singular
    }
}

fn singularize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let stem_len = |cut: usize| name.len().saturating_sub(cut);

    let singular = if lower.ends_with("ies") && name.len() > 3 {
        format!("{}y", &name[..stem_len(3)])
    } else if ["ses", "xes", "zes", "ches", "shes"]
        .iter()
        .any(|ending| lower.ends_with(ending))
    {
        name[..stem_len(2)].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && name.len() > 1 {
        name[..stem_len(1)].to_string()
    } else {
        name.to_string()
    };

    if singular.is_empty() {
        name.to_string()
    } else {
        singular
    }
}
