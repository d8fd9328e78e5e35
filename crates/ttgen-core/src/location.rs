//! Source locations for error reporting and generated-code comments.

use std::path::PathBuf;

/// A span in the original source: file plus begin/end line.
///
/// Every `Statement` carries one of these (§3); the generator threads it
/// through to runtime error calls so `"none of the branches can be chosen
/// <location>"`-style messages can name a file and line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    /// Begin line, 0-indexed.
    pub begin_line: usize,
    /// End line, 0-indexed, inclusive.
    pub end_line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        SourceLocation {
            file: file.into(),
            begin_line: line,
            end_line: line,
        }
    }

    pub fn span(file: impl Into<PathBuf>, begin_line: usize, end_line: usize) -> Self {
        debug_assert!(begin_line <= end_line);
        SourceLocation {
            file: file.into(),
            begin_line,
            end_line,
        }
    }

    /// Render as `file:line` or `file:begin-end`, the form embedded in
    /// generated error-message string literals.
    pub fn display_short(&self) -> String {
        if self.begin_line == self.end_line {
            format!("{}:{}", self.file.display(), self.begin_line + 1)
        } else {
            format!(
                "{}:{}-{}",
                self.file.display(),
                self.begin_line + 1,
                self.end_line + 1
            )
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_display() {
        let loc = SourceLocation::new("proto.ttcn", 41);
        assert_eq!(loc.display_short(), "proto.ttcn:42");
    }

    #[test]
    fn span_display() {
        let loc = SourceLocation::span("proto.ttcn", 10, 12);
        assert_eq!(loc.display_short(), "proto.ttcn:11-13");
    }
}
