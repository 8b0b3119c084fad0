//! Refuse to write generated files into operating-system directories.

use std::path::{Component, Path, PathBuf};

use crate::error::{GenError, Result};

/// Windows roots, compared case-insensitively.
const WINDOWS_DENIED: [&str; 3] = [r"C:\Windows", r"C:\Program Files", r"C:\System"];

/// Unix roots, compared case-sensitively.
const UNIX_DENIED: [&str; 5] = ["/System", "/usr", "/bin", "/sbin", "/etc"];

/// Resolve `input` to an absolute path and reject system directories.
///
/// Denied roots match whole path components, so `/etc` and `/etc/nginx` are
/// rejected while `/etcetera` and `/binaries/out` are allowed.
///
/// Must run before any directory is created or file written.
pub fn validate_path(input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|err| GenError::io("Failed to resolve current directory", err))?
            .join(input)
    };
    let resolved = normalize(&absolute);

    if is_denied(&resolved.to_string_lossy()) {
        return Err(GenError::UnsafePath(resolved));
    }
    Ok(resolved)
}

/// Lexically collapse `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether an absolute path string falls under a denied root.
///
/// Paths with a drive letter or backslashes are treated as Windows paths.
fn is_denied(resolved: &str) -> bool {
    let windows_style = resolved.contains('\\') || resolved.get(1..2) == Some(":");
    if windows_style {
        let candidate = resolved.replace('/', "\\").to_ascii_uppercase();
        WINDOWS_DENIED
            .iter()
            .any(|root| is_under(&candidate, &root.to_ascii_uppercase(), '\\'))
    } else {
        UNIX_DENIED.iter().any(|root| is_under(resolved, root, '/'))
    }
}

fn is_under(candidate: &str, root: &str, separator: char) -> bool {
    candidate
        .strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(separator))
}
