use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Directories never entered, on top of whatever gitignore excludes.
const EXCLUDE_DIRS: &[&str] = &["build", "dist", "__pycache__", ".vscode", "venv", ".git", "videos"];

/// Files never indexed even though they are Python sources.
const EXCLUDE_FILES: &[&str] = &["__init__.py"];

/// Scanner for finding the Python sources of a workspace.
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scan the workspace for Python files (.gitignore aware).
    ///
    /// Results are sorted so repeated scans enumerate files in the same
    /// order.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(|entry| {
            let Some(name) = entry.file_name().to_str() else {
                return false;
            };
            !(entry.path().is_dir() && EXCLUDE_DIRS.contains(&name))
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !Self::is_python_source(path) {
                        continue;
                    }
                    if Self::is_excluded_file(path) {
                        log::debug!("Skipping excluded file {}", path.display());
                        continue;
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} Python files", files.len());
        files
    }

    fn is_python_source(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("py"))
            .unwrap_or(false)
    }

    fn is_excluded_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| EXCLUDE_FILES.contains(&name))
            .unwrap_or(false)
    }
}
