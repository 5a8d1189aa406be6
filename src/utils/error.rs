//! Error handling for filter runs
//!
//! Fatal conditions surface as [`FilterError`]. Everything a single pass can
//! recover from is collected as a [`FilterWarning`] on the context and
//! reported once the pipeline has finished.

use std::fmt;

use serde::Serialize;
use texdocx_ast::AstError;

/// Filter error type
#[derive(Debug, Clone)]
pub enum FilterError {
    /// Input is not a Pandoc JSON document, or output could not be written
    Json { message: String },
    /// Document comes from a Pandoc this filter cannot read
    UnsupportedApiVersion { version: Vec<u32> },
    /// A pass needs a registry no earlier pass fills
    PassOrder { pass: String, missing: String },
    /// Option file could not be read
    Config { message: String },
    /// IO error (for file operations)
    Io { message: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Json { message } => write!(f, "JSON error: {}", message),
            FilterError::UnsupportedApiVersion { version } => {
                let dotted: Vec<String> = version.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "Unsupported pandoc-api-version {}; Pandoc 3.0 or newer is required",
                    dotted.join(".")
                )
            }
            FilterError::PassOrder { pass, missing } => {
                write!(
                    f,
                    "Pass '{}' reads the {} registry before any pass fills it",
                    pass, missing
                )
            }
            FilterError::Config { message } => write!(f, "Config error: {}", message),
            FilterError::Io { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Io {
            message: err.to_string(),
        }
    }
}

impl From<AstError> for FilterError {
    fn from(err: AstError) -> Self {
        match err {
            AstError::Json(message) => FilterError::Json { message },
            AstError::UnsupportedApiVersion(version) => {
                FilterError::UnsupportedApiVersion { version }
            }
        }
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// What went wrong with a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Image in a format the target cannot embed
    UnsupportedImage,
    /// `\ref`/`\eqref` whose label was never registered
    UnresolvedReference,
    /// Element had no text to prepend its number to
    MissingText,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::UnsupportedImage => "unsupported image",
            WarningKind::UnresolvedReference => "unresolved reference",
            WarningKind::MissingText => "missing text",
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            WarningKind::UnsupportedImage | WarningKind::UnresolvedReference => {
                DiagnosticSeverity::Warning
            }
            WarningKind::MissingText => DiagnosticSeverity::Info,
        }
    }
}

/// Non-fatal issue found while filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterWarning {
    pub kind: WarningKind,
    pub message: String,
    /// Element the warning is about, e.g. an image path or a label
    pub location: Option<String>,
}

impl FilterWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    /// Add location context.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render for a terminal, optionally wrapped in the severity color.
    pub fn render(&self, color: bool) -> String {
        if color {
            format!("{}{}\x1b[0m", self.kind.severity().color_code(), self)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind.as_str(), loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind.as_str(), self.message)
        }
    }
}

/// Severity level for CLI diagnostics (determines coloring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Warnings (yellow) - e.g., broken references, unusable images
    Warning,
    /// Informational (cyan) - e.g., element left unlabelled
    Info,
}

impl DiagnosticSeverity {
    /// Get ANSI color code for this severity.
    pub fn color_code(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "\x1b[33m", // yellow
            DiagnosticSeverity::Info => "\x1b[36m",    // cyan
        }
    }
}

// Convenience constructors for errors
impl FilterError {
    pub fn json(message: impl Into<String>) -> Self {
        FilterError::Json {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FilterError::Config {
            message: message.into(),
        }
    }

    pub fn pass_order(pass: impl Into<String>, missing: impl Into<String>) -> Self {
        FilterError::PassOrder {
            pass: pass.into(),
            missing: missing.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_error_display() {
        let err = FilterError::from(AstError::UnsupportedApiVersion(vec![1, 22, 4]));
        let msg = err.to_string();
        assert!(msg.contains("1.22.4"));
        assert!(msg.contains("Pandoc 3.0"));
    }

    #[test]
    fn test_pass_order_display() {
        let err = FilterError::pass_order("equation-references", "equation");
        let msg = err.to_string();
        assert!(msg.contains("equation-references"));
        assert!(msg.contains("equation registry"));
    }

    #[test]
    fn test_warning_display_with_location() {
        let warning = FilterWarning::new(WarningKind::UnsupportedImage, "convert to PNG first")
            .with_location("texfiles/plot.pdf");
        assert_eq!(
            warning.to_string(),
            "[unsupported image] texfiles/plot.pdf: convert to PNG first"
        );
    }

    #[test]
    fn test_warning_render_color() {
        let warning = FilterWarning::new(WarningKind::UnresolvedReference, "no such label");
        let colored = warning.render(true);
        assert!(colored.starts_with("\x1b[33m"));
        assert!(colored.ends_with("\x1b[0m"));
        assert_eq!(warning.render(false), "[unresolved reference] no such label");
    }
}
