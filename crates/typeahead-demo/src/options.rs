#![forbid(unsafe_code)]

//! Candidate lists for the demo fields.

use std::fs;
use std::io;
use std::path::Path;

use typeahead_widgets::autocomplete::{Candidates, candidates};

/// Built-in candidate list.
pub const CURRENCIES: &[&str] = &[
    "Australian dollar",
    "Brazilian real",
    "British pound",
    "Canadian dollar",
    "Chinese yuan",
    "Czech koruna",
    "Danish krone",
    "Euro",
    "Hong Kong dollar",
    "Hungarian forint",
    "Indian rupee",
    "Indonesian rupiah",
    "Israeli new shekel",
    "Japanese yen",
    "Mexican peso",
    "New Zealand dollar",
    "Norwegian krone",
    "Philippine peso",
    "Polish zloty",
    "Singapore dollar",
    "South African rand",
    "South Korean won",
    "Swedish krona",
    "Swiss franc",
    "Thai baht",
    "Turkish lira",
    "United States dollar",
];

/// The built-in list as shared candidates.
pub fn builtin() -> Candidates {
    candidates(CURRENCIES.iter().copied())
}

/// One candidate per line; surrounding whitespace trimmed, blank lines
/// skipped.
pub fn parse_candidates(text: &str) -> Candidates {
    candidates(text.lines().map(str::trim).filter(|line| !line.is_empty()))
}

/// Load candidates from `path`, or the built-in list when `None`.
pub fn load(path: Option<&Path>) -> io::Result<Candidates> {
    let Some(path) = path else {
        return Ok(builtin());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
    let list = parse_candidates(&text);
    if list.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: no candidates", path.display()),
        ));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_is_nonempty_and_unique() {
        let list = builtin();
        assert_eq!(list.len(), CURRENCIES.len());
        let mut sorted: Vec<&String> = list.iter().collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), list.len());
    }

    #[test]
    fn parse_skips_blank_lines() {
        let list = parse_candidates("Euro\n\n  Yen  \n\t\nWon");
        assert_eq!(&*list, ["Euro", "Yen", "Won"]);
    }

    #[test]
    fn load_defaults_to_builtin() {
        assert_eq!(load(None).map(|l| l.len()).ok(), Some(CURRENCIES.len()));
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = load(Some(Path::new("/nonexistent/typeahead/candidates.txt"))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("candidates.txt"));
    }

    #[test]
    fn load_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("candidates.txt");
        fs::write(&path, "Lek\nDram\n").unwrap();
        let list = load(Some(&path)).unwrap();
        assert_eq!(&*list, ["Lek", "Dram"]);
    }

    #[test]
    fn load_rejects_blank_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blank.txt");
        fs::write(&path, "\n  \n").unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("blank.txt"));
    }
}
