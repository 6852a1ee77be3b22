use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WordSourceError {
    #[error("could not read word list `{path}`: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Supplies the danger-word list. Implementations are consulted on every
/// classification pass and must not cache.
pub trait WordSource: Send + Sync {
    fn load_words(&self) -> Result<Vec<String>, WordSourceError>;

    fn describe(&self) -> String;
}

/// Reads one word per line from a file on each call.
#[derive(Clone, Debug)]
pub struct FileWordSource {
    path: PathBuf,
}

impl FileWordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WordSource for FileWordSource {
    fn load_words(&self) -> Result<Vec<String>, WordSourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|error| WordSourceError::Unreadable {
            path: self.path.clone(),
            message: error.to_string(),
        })?;
        Ok(parse_word_list(&raw))
    }

    fn describe(&self) -> String {
        format!("file ({})", self.path.display())
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticWordSource {
    words: Vec<String>,
}

impl StaticWordSource {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|word| word.as_ref().to_string()).collect() }
    }
}

impl WordSource for StaticWordSource {
    fn load_words(&self) -> Result<Vec<String>, WordSourceError> {
        Ok(self.words.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} words)", self.words.len())
    }
}

/// Trims and lower-cases each line. Blank lines are skipped: an empty word
/// would match every dish.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{parse_word_list, FileWordSource, StaticWordSource, WordSource, WordSourceError};

    #[test]
    fn parse_word_list_trims_and_skips_blank_lines() {
        assert_eq!(parse_word_list("beef\n  Chicken \r\n\n pork\n"), vec!["beef", "chicken", "pork"]);
    }

    #[test]
    fn file_source_rereads_on_every_call() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("meat_words.txt");
        fs::write(&path, "beef\n").expect("write word list");
        let source = FileWordSource::new(&path);

        assert_eq!(source.load_words().expect("first load"), vec!["beef"]);

        fs::write(&path, "beef\nlamb\n").expect("rewrite word list");
        assert_eq!(source.load_words().expect("second load"), vec!["beef", "lamb"]);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent.txt");
        let error = FileWordSource::new(&path).load_words().expect_err("missing file should fail");

        assert!(matches!(error, WordSourceError::Unreadable { path: ref reported, .. } if reported == &path));
    }

    #[test]
    fn static_source_returns_words_verbatim() {
        let source = StaticWordSource::new(["beef", "pork"]);
        assert_eq!(source.load_words().expect("static load"), vec!["beef", "pork"]);
        assert_eq!(source.describe(), "static (2 words)");
    }
}
