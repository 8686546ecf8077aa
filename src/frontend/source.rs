use std::fs;
use std::path::Path;

/// A loaded compilation input: either a file read from disk or a literal
/// fragment (REPL lines, tests). Keeps the raw text plus the name used in
/// diagnostics.
pub struct SourceFile {
    name: String,
    contents: String,
    exists: bool,
}

impl SourceFile {
    pub fn from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self {
                name: path.display().to_string(),
                contents,
                exists: true,
            },
            Err(_) => Self {
                name: path.display().to_string(),
                contents: String::new(),
                exists: false,
            },
        }
    }

    pub fn from_literal(contents: impl Into<String>) -> Self {
        Self {
            name: "<input>".to_string(),
            contents: contents.into(),
            exists: true,
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// The nth 1-based line, without its line terminator. Out-of-range
    /// lines come back empty so diagnostic rendering never fails.
    pub fn line(&self, n: usize) -> &str {
        self.contents
            .lines()
            .nth(n.saturating_sub(1))
            .unwrap_or("")
    }
}
