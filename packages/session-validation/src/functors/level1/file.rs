//! File and directory paths
//!
//! Checks run in a fixed order and stop at the first failure: existence,
//! directory-ness (only for paths that exist), then the length of the
//! canonical path string.

use crate::constraints::{Constraints, MustExist};
use crate::functors::Verdict;
use crate::value::ParamValue;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct FileValidator;

impl FileValidator {
    pub fn validate(&self, raw: &str, constraints: &Constraints) -> Verdict {
        let path = match canonical_path(raw.trim()) {
            Some(p) => p,
            None => return Verdict::reject(format!("'{}' cannot be resolved to a path", raw)),
        };
        let shown = path.display().to_string();

        let metadata = fs::metadata(&path).ok();
        let exists = metadata.is_some();

        match constraints.must_exist() {
            MustExist::MustExist if !exists => {
                return Verdict::reject(format!("{} does not exist", shown));
            }
            MustExist::MustNotExist if exists => {
                return Verdict::reject(format!("{} already exists", shown));
            }
            _ => {}
        }

        if let Some(meta) = metadata {
            let want_directory = constraints.is_directory().get();
            if want_directory && !meta.is_dir() {
                return Verdict::reject(format!("{} is not a directory", shown));
            }
            if !want_directory && meta.is_dir() {
                return Verdict::reject(format!("{} is a directory", shown));
            }
        }

        let length = shown.chars().count();
        if !constraints.length_in_range(length) {
            return Verdict::reject(format!(
                "{} has length {} which does not lie in range {}",
                shown,
                length,
                constraints.long_range_text()
            ));
        }

        Verdict::Accept(ParamValue::Path(path))
    }
}

/// Canonical form when the path resolves, otherwise the plain absolute form
fn canonical_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let path = Path::new(raw);
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .ok()
}
