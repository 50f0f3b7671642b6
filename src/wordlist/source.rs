// src/wordlist/source.rs
// =============================================================================
// Loading and slicing wordlists.
//
// Format: plain text, one candidate word per line.
// - Lines are split on '\n'; a trailing '\r' is stripped so CRLF files work
// - The empty segment after a terminating newline is not a word
// - Everything else (blank lines, spaces, duplicates) passes through as-is
//
// Rust concepts:
// - Iterators: skip/take cut out the requested slice without copying the rest
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("could not read wordlist '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Reads a wordlist file into memory
//
// Returns every line of the file as a separate word, in file order.
pub fn load(path: &Path) -> Result<Vec<String>, WordlistError> {
    let content = std::fs::read_to_string(path).map_err(|source| WordlistError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(split_lines(&content))
}

fn split_lines(content: &str) -> Vec<String> {
    let body = content.strip_suffix('\n').unwrap_or(content);
    if body.is_empty() {
        return Vec::new();
    }

    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

// Returns the contiguous run of at most `count` words starting at `start`
//
// Out-of-range offsets give an empty list rather than an error.
//
// Example:
//   words = ["a", "b", "c"], start = 1, count = 5 -> ["b", "c"]
pub fn slice(words: &[String], start: usize, count: usize) -> Vec<String> {
    words.iter().skip(start).take(count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_slice_length_matches_bounds() {
        let list = words(&["a", "b", "c", "d", "e"]);
        for start in 0..8 {
            for count in 0..8 {
                let sliced = slice(&list, start, count);
                let expected = count.min(list.len().saturating_sub(start));
                assert_eq!(sliced.len(), expected, "start={} count={}", start, count);
                if expected > 0 {
                    assert_eq!(sliced, list[start..start + expected].to_vec());
                }
            }
        }
    }

    #[test]
    fn test_slice_start_past_end_is_empty() {
        let list = words(&["apple", "banana", "cherry"]);
        assert!(slice(&list, 5, 10).is_empty());
    }

    #[test]
    fn test_slice_zero_count() {
        let list = words(&["apple", "banana", "cherry"]);
        assert!(slice(&list, 0, 0).is_empty());
    }

    #[test]
    fn test_slice_keeps_duplicates_and_blanks() {
        let list = words(&["a", "", "a", " b "]);
        assert_eq!(slice(&list, 0, 4), list);
    }

    #[test]
    fn test_split_handles_crlf() {
        assert_eq!(split_lines("admin\r\nlogin\r\n"), words(&["admin", "login"]));
    }

    #[test]
    fn test_split_keeps_inner_blank_lines() {
        assert_eq!(split_lines("a\n\nb"), words(&["a", "", "b"]));
    }

    #[test]
    fn test_split_empty_file() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n").is_empty());
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "apple\nbanana\ncherry\n").unwrap();

        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded, words(&["apple", "banana", "cherry"]));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
