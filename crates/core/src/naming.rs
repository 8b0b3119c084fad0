//! Identifier casing for user-supplied and derived names.

/// `^[A-Za-z][A-Za-z0-9]*$`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// PascalCase a name unless it is already a plain identifier.
///
/// A `-`, `_` or `/` followed by any character is dropped and that
/// character upper-cased; then the first character is upper-cased.
/// Plain identifiers (`getUser`, `ApiResponse`) come back untouched.
pub fn pascal_case(name: &str) -> String {
    if is_valid_identifier(name) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if matches!(c, '-' | '_' | '/')
            && let Some(next) = chars.next()
        {
            out.extend(next.to_uppercase());
        } else {
            out.push(c);
        }
    }
    upper_first(&out)
}

/// Upper-case the first character only.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop characters that cannot appear in a TypeScript identifier,
/// upper-casing the character that follows each one.
pub(crate) fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            out.push(if upper_next { c.to_ascii_uppercase() } else { c });
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_are_untouched() {
        assert_eq!(pascal_case("getUser"), "getUser");
        assert_eq!(pascal_case("ApiResponse"), "ApiResponse");
        assert_eq!(pascal_case("get"), "get");
    }

    #[test]
    fn separators_are_folded() {
        assert_eq!(pascal_case("_users"), "Users");
        assert_eq!(pascal_case("_api_users_list"), "ApiUsersList");
        assert_eq!(pascal_case("user-profile"), "UserProfile");
        assert_eq!(pascal_case("a/b"), "AB");
        assert_eq!(pascal_case("1st_item"), "1stItem");
    }

    #[test]
    fn trailing_separator_is_kept() {
        assert_eq!(pascal_case("users_"), "Users_");
    }

    #[test]
    fn sanitizes_path_parameters() {
        assert_eq!(sanitize_identifier(&pascal_case("_users_{id}")), "UsersId");
        assert_eq!(upper_first("get"), "Get");
        assert_eq!(upper_first(""), "");
    }
}
