//! Source file discovery.
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Files to scan: every `.rs` file under `root` when `patterns` is empty,
/// otherwise the literal paths and glob matches of `patterns`, in order and
/// without duplicates.
pub fn resolve_file_path_patterns<I>(root: &Path, patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut patterns: Vec<String> = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();
    if patterns.is_empty() {
        patterns.push(root.join("**").join("*.rs").to_string_lossy().into_owned());
    }

    let mut out = Vec::<PathBuf>::new();
    for pattern in &patterns {
        if has_glob_chars(pattern) {
            let entries = glob::glob(pattern).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            let mut matched_any = false;
            for entry in entries {
                let path = entry?;
                matched_any = true;
                if !out.contains(&path) {
                    out.push(path);
                }
            }
            if !matched_any {
                return Err(Error::NoMatch(pattern.clone()));
            }
        } else {
            let path = PathBuf::from(pattern);
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }
    Ok(out)
}

/// Glob syntax understood by the `glob` crate.
fn has_glob_chars(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_every_rust_file_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("lib.rs"), "").unwrap();
        std::fs::write(dir.path().join("config/mod.rs"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();

        let files = resolve_file_path_patterns(dir.path(), Vec::<String>::new()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|file| file.extension().is_some_and(|ext| ext == "rs")));
    }

    #[test]
    fn literal_paths_pass_through() {
        let files = resolve_file_path_patterns(Path::new("src"), ["src/lib.rs", "src/lib.rs"]).unwrap();
        assert_eq!(files, [PathBuf::from("src/lib.rs")]);
    }

    #[test]
    fn globs_without_matches_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.rs").to_string_lossy().into_owned();
        let error = resolve_file_path_patterns(dir.path(), [pattern]).unwrap_err();
        assert!(matches!(error, Error::NoMatch(_)));
    }
}
