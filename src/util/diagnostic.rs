//! User-friendly diagnostic messages.
//!
//! Every error shown to the user carries its root cause and, where one
//! exists, a suggested fix.

use std::fmt;
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a delegated build step fails.
    pub const BUILD_FAILED: &str = "Run `sfc-recipe build --verbose` for more details";

    /// Suggestion when no CMakeLists.txt is found.
    pub const NO_BUILD_DESCRIPTION: &str =
        "Run from the sfc source tree or pass `--recipe-dir <dir>`";

    /// Suggestion when CMake cannot be found.
    pub const CMAKE_NOT_FOUND: &str = "Install CMake or set `program` in the `[cmake]` config section";

    /// Suggestion when packaging runs before a build.
    pub const BUILD_FIRST: &str = "Run `sfc-recipe build` before `sfc-recipe package`";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let error = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        // Main message
        output.push_str(&format!("{}: {}\n", error, self.message));

        // Location if present
        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        // Context lines
        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        // Suggestions
        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
