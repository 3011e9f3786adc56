//! Path checks and clean-up for user-supplied executable paths.
//!
//! Three small rules, shared by the startup check and the setup dialog:
//!
//! - [`is_valid_path`] – "does this point at something that exists right now?"
//! - [`sanitize_input`] – strip the whitespace and quotes people paste in from
//!   Explorer's "Copy as path".
//! - [`normalize_path`] – lexical clean-up of a picker result so the field
//!   shows `C:\Tools\app.exe` rather than `C:/Tools/./app.exe`.

use std::path::{Path, MAIN_SEPARATOR};

/// Returns `true` when `path` is non-empty and names an existing
/// file-system entry at call time.
///
/// The check is repeated on every call; nothing is cached.
pub fn is_valid_path(path: Option<&str>) -> bool {
    match path {
        Some(p) if !p.is_empty() => Path::new(p).exists(),
        _ => false,
    }
}

/// Trims surrounding whitespace, then surrounding `"` characters.
///
/// Only the outer layer of whitespace is trimmed, so `" \"a b\" "` becomes
/// `a b` while `"\" a \""` keeps its inner spaces.
pub fn sanitize_input(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Normalises separators and `.`/`..` components without touching the disk.
pub fn normalize_path(path: &str) -> String {
    normalize_with(path, MAIN_SEPARATOR)
}

fn normalize_with(path: &str, sep: char) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let windows = sep == '\\';
    let is_sep = |c: char| c == '/' || (windows && c == '\\');

    // Split off a drive (`C:`) or UNC (`\\server\share`) prefix.
    let mut prefix = String::new();
    let mut rest = path;
    if windows {
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            prefix.push_str(&path[..2]);
            rest = &path[2..];
        } else if path.chars().take(2).all(is_sep) && path.len() > 2 {
            let parts: Vec<&str> = path[2..].splitn(3, is_sep).collect();
            if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
                prefix = format!("{sep}{sep}{}{sep}{}", parts[0], parts[1]);
                rest = parts.get(2).copied().unwrap_or("");
                // A UNC share is always rooted.
                return join_components(&prefix, true, rest, sep, is_sep);
            }
        }
    }

    let rooted = rest.starts_with(is_sep);
    join_components(&prefix, rooted, rest, sep, is_sep)
}

fn join_components(
    prefix: &str,
    rooted: bool,
    rest: &str,
    sep: char,
    is_sep: impl Fn(char) -> bool,
) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in rest.split(is_sep) {
        match part {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if rooted => {}
                _ => stack.push(".."),
            },
            other => stack.push(other),
        }
    }

    let mut out = String::from(prefix);
    if rooted {
        out.push(sep);
    }
    out.push_str(&stack.join(&sep.to_string()));
    if out.is_empty() {
        out.push('.');
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_empty_paths_are_invalid() {
        assert!(!is_valid_path(None));
        assert!(!is_valid_path(Some("")));
    }

    #[test]
    fn test_missing_path_is_invalid() {
        assert!(!is_valid_path(Some("/nonexistent/path/that/cannot/exist/app.exe")));
    }

    #[test]
    fn test_existing_file_is_valid() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("potlink_paths_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("player.exe");
        std::fs::write(&file, b"").unwrap();

        // Act / Assert
        assert!(is_valid_path(file.to_str()));

        // A later deletion is seen on the next call.
        std::fs::remove_file(&file).unwrap();
        assert!(!is_valid_path(file.to_str()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_sanitize_strips_whitespace_then_quotes() {
        assert_eq!(sanitize_input("  \"C:\\a b\\p.exe\"  "), "C:\\a b\\p.exe");
        assert_eq!(sanitize_input("\"\"x\"\""), "x");
        assert_eq!(sanitize_input("plain"), "plain");
    }

    #[test]
    fn test_sanitize_keeps_whitespace_inside_quotes() {
        assert_eq!(sanitize_input("\" padded \""), " padded ");
    }

    #[test]
    fn test_normalize_windows_forward_slashes() {
        assert_eq!(
            normalize_with("C:/Program Files/DAUM/PotPlayer/PotPlayerMini64.exe", '\\'),
            r"C:\Program Files\DAUM\PotPlayer\PotPlayerMini64.exe"
        );
    }

    #[test]
    fn test_normalize_windows_dot_segments() {
        assert_eq!(normalize_with(r"C:\a\.\b\..\c.exe", '\\'), r"C:\a\c.exe");
        assert_eq!(normalize_with(r"C:\..\x.exe", '\\'), r"C:\x.exe");
        assert_eq!(normalize_with(r"..\a\..\..\b", '\\'), r"..\..\b");
    }

    #[test]
    fn test_normalize_windows_unc_share() {
        assert_eq!(
            normalize_with("//nas/media/tools/../AlistHelper.exe", '\\'),
            r"\\nas\media\AlistHelper.exe"
        );
    }

    #[test]
    fn test_normalize_unix_collapses_duplicate_separators() {
        assert_eq!(normalize_with("/opt//potlink/./bin/", '/'), "/opt/potlink/bin");
        assert_eq!(normalize_with("a/..", '/'), ".");
    }

    #[test]
    fn test_normalize_unix_keeps_backslashes_literal() {
        assert_eq!(normalize_with("/tmp/a\\b", '/'), "/tmp/a\\b");
    }
}
