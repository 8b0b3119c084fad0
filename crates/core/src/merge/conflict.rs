/// Outcome of checking a candidate name against the names already in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The name to actually use.
    pub name: String,
    /// Whether `name` differs from the candidate.
    pub renamed: bool,
    /// Numeric suffix that was appended, 0 when not renamed.
    pub suffix: u32,
}

/// Pick a free name for `candidate`: itself if unused, otherwise the first
/// `candidate1`, `candidate2`, ... not present in `existing`.
pub fn resolve_conflict<S: AsRef<str>>(existing: &[S], candidate: &str) -> Resolution {
    let taken = |name: &str| existing.iter().any(|e| e.as_ref() == name);

    if !taken(candidate) {
        return Resolution {
            name: candidate.to_string(),
            renamed: false,
            suffix: 0,
        };
    }

    let mut suffix = 1;
    let mut name = format!("{candidate}{suffix}");
    while taken(&name) {
        suffix += 1;
        name = format!("{candidate}{suffix}");
    }

    Resolution {
        name,
        renamed: true,
        suffix,
    }
}
