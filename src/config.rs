//! Filter options
//!
//! Every knob has a default matching the behaviour expected for a LaTeX
//! paper converted to DOCX. The CLI and option files only override fields.

use serde::{Deserialize, Serialize};

/// Output format the filtered document is rendered to.
///
/// Pandoc passes the target format as the filter's first argument; only the
/// equation numbering annotation depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Docx,
    Latex,
    Other,
}

impl OutputFormat {
    /// Map a Pandoc writer name (`docx`, `latex`, `beamer`, ...) to a format.
    pub fn from_pandoc_name(name: &str) -> Self {
        // writer names may carry extensions, e.g. `docx+styles`
        let base = name
            .split(|c: char| c == '+' || c == '-')
            .next()
            .unwrap_or(name)
            .to_ascii_lowercase();
        match base.as_str() {
            "docx" => OutputFormat::Docx,
            "latex" | "beamer" => OutputFormat::Latex,
            _ => OutputFormat::Other,
        }
    }

    /// Text appended to a display equation to show its number.
    pub fn equation_tag(&self, number: &str) -> String {
        match self {
            // Word's equation-array numbering operator
            OutputFormat::Docx => format!(" \\#{}", number),
            OutputFormat::Latex => {
                let bare = number.trim_start_matches('(').trim_end_matches(')');
                format!("\\tag{{{}}}", bare)
            }
            OutputFormat::Other => format!("\\qquad {}", number),
        }
    }
}

/// Options for one filter run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Directory prepended to every image path.
    /// Default: `texfiles/`
    pub image_prefix: String,

    /// Indent the first line of top-level paragraphs.
    /// Default: false
    pub indent_paragraphs: bool,

    /// Whitespace used for the first-line indent.
    /// Default: eight spaces
    pub indent: String,

    /// Identifier of the Div Pandoc puts the generated bibliography in.
    /// Default: `refs`
    pub bibliography_id: String,

    /// Text of the heading inserted before the bibliography.
    /// Default: `References`
    pub references_title: String,

    /// Identifier of the heading inserted before the bibliography.
    /// Default: `references`
    pub references_id: String,

    /// Div class marking theorem-like blocks.
    /// Default: `theorem`
    pub theorem_class: String,

    /// Header class excluding a top-level heading from numbering.
    /// Default: `unnumbered`
    pub unnumbered_class: String,

    /// Format the document is rendered to.
    /// Default: docx
    pub target: OutputFormat,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            image_prefix: "texfiles/".to_string(),
            indent_paragraphs: false,
            indent: " ".repeat(8),
            bibliography_id: "refs".to_string(),
            references_title: "References".to_string(),
            references_id: "references".to_string(),
            theorem_class: "theorem".to_string(),
            unnumbered_class: "unnumbered".to_string(),
            target: OutputFormat::Docx,
        }
    }
}

impl FilterOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a given Pandoc writer name
    pub fn for_target(name: &str) -> Self {
        Self {
            target: OutputFormat::from_pandoc_name(name),
            ..Self::default()
        }
    }

    /// Parse options from TOML; missing keys keep their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(input: &str) -> crate::utils::error::FilterResult<Self> {
        toml::from_str(input).map_err(|e| crate::utils::error::FilterError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FilterOptions::default();
        assert_eq!(options.image_prefix, "texfiles/");
        assert_eq!(options.indent.len(), 8);
        assert!(!options.indent_paragraphs);
        assert_eq!(options.bibliography_id, "refs");
        assert_eq!(options.target, OutputFormat::Docx);
    }

    #[test]
    fn test_pandoc_writer_names() {
        assert_eq!(OutputFormat::from_pandoc_name("docx"), OutputFormat::Docx);
        assert_eq!(OutputFormat::from_pandoc_name("docx+styles"), OutputFormat::Docx);
        assert_eq!(OutputFormat::from_pandoc_name("beamer"), OutputFormat::Latex);
        assert_eq!(OutputFormat::from_pandoc_name("html5"), OutputFormat::Other);
    }

    #[test]
    fn test_equation_tags() {
        assert_eq!(OutputFormat::Docx.equation_tag("(1.2)"), " \\#(1.2)");
        assert_eq!(OutputFormat::Latex.equation_tag("(1.2)"), "\\tag{1.2}");
        assert_eq!(OutputFormat::Other.equation_tag("(1.2)"), "\\qquad (1.2)");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_toml_overrides_only_given_keys() {
        let options = FilterOptions::from_toml_str(
            "image_prefix = \"figures/\"\nindent_paragraphs = true\ntarget = \"latex\"\n",
        )
        .unwrap();
        assert_eq!(options.image_prefix, "figures/");
        assert!(options.indent_paragraphs);
        assert_eq!(options.target, OutputFormat::Latex);
        assert_eq!(options.theorem_class, "theorem");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn test_toml_type_error_is_config_error() {
        let err = FilterOptions::from_toml_str("indent_paragraphs = \"yes\"").unwrap_err();
        assert!(err.to_string().starts_with("Config error"));
    }
}
