use crate::error::Result;
use crate::scanner::FileScanner;
use codemap_parser::SourceParser;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Fetches declaration body text by callable identifier.
///
/// Sources are loaded once; every fetch re-parses them to find matching
/// declarations. A qualified identifier is looked up by its trailing name,
/// matching how methods are declared in source.
pub struct SourceFetcher {
    files: Vec<(PathBuf, String)>,
    parser: RefCell<SourceParser>,
}

impl SourceFetcher {
    /// Load every Python source under `root`.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let mut files = Vec::new();
        for path in FileScanner::new(&root).scan() {
            match fs::read_to_string(&path) {
                Ok(source) => files.push((path, source)),
                Err(e) => log::warn!("Failed to read {}: {e}", path.display()),
            }
        }
        Self::from_files(files)
    }

    pub fn from_files(files: Vec<(PathBuf, String)>) -> Result<Self> {
        Ok(Self {
            files,
            parser: RefCell::new(SourceParser::new()?),
        })
    }

    pub fn files(&self) -> &[(PathBuf, String)] {
        &self.files
    }

    /// Body text for a callable or class; empty when nothing matches.
    ///
    /// Multiple declarations sharing the name concatenate in file order,
    /// which also covers classes split across files.
    pub fn fetch(&self, identifier: &str) -> String {
        let name = identifier.rsplit('.').next().unwrap_or(identifier);

        let mut bodies = Vec::new();
        for (path, source) in &self.files {
            match self.parser.borrow_mut().declaration_bodies(source, name) {
                Ok(found) => bodies.extend(found),
                Err(e) => log::debug!(
                    "Skipping {} while fetching '{identifier}': {e}",
                    path.display()
                ),
            }
        }
        bodies.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fetcher(files: Vec<(&str, &str)>) -> SourceFetcher {
        SourceFetcher::from_files(
            files
                .into_iter()
                .map(|(path, source)| (PathBuf::from(path), source.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn fetches_a_function_body() {
        let fetcher = fetcher(vec![("a.py", "def f():\n    return 1\n")]);
        assert_eq!(fetcher.fetch("f"), "def f():\n    return 1");
    }

    #[test]
    fn strips_the_class_prefix() {
        let fetcher = fetcher(vec![(
            "a.py",
            "class Foo:\n    def bar(self):\n        return 2\n",
        )]);
        assert_eq!(fetcher.fetch("Foo.bar"), "def bar(self):\n        return 2");
    }

    #[test]
    fn concatenates_matches_across_files() {
        let fetcher = fetcher(vec![
            ("a.py", "def f():\n    return 1\n"),
            ("b.py", "def f():\n    return 2\n"),
        ]);
        assert_eq!(
            fetcher.fetch("f"),
            "def f():\n    return 1\ndef f():\n    return 2"
        );
    }

    #[test]
    fn missing_identifier_reads_as_empty() {
        let fetcher = fetcher(vec![("a.py", "def f():\n    pass\n")]);
        assert_eq!(fetcher.fetch("absent"), "");
    }

    #[test]
    fn malformed_files_are_skipped_not_fatal() {
        let fetcher = fetcher(vec![
            ("bad.py", "def broken(:\n"),
            ("good.py", "def f():\n    return 3\n"),
        ]);
        assert_eq!(fetcher.fetch("f"), "def f():\n    return 3");
    }
}
