use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Expand possible glob patterns in a list of input strings into concrete file paths.
///
/// Literal paths must exist. Patterns that match nothing are an error, so a
/// typo in `--sources` does not silently turn every message vanished.
/// The result is sorted and free of duplicates.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<PathBuf>, String> {
    let mut files = BTreeSet::new();

    for input in inputs {
        if !has_glob_meta(input) {
            let path = Path::new(input);
            if !path.is_file() {
                return Err(format!("File does not exist: {}", input));
            }
            files.insert(path.to_path_buf());
            continue;
        }

        let entries =
            glob::glob(input).map_err(|e| format!("Invalid glob pattern '{}': {}", input, e))?;
        let mut matched = false;
        for entry in entries {
            let path = entry.map_err(|e| format!("Cannot read {}: {}", e.path().display(), e))?;
            if path.is_file() {
                matched = true;
                files.insert(path);
            }
        }
        if !matched {
            return Err(format!("Pattern matched no files: {}", input));
        }
    }

    Ok(files.into_iter().collect())
}
