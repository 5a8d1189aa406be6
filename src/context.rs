//! State shared by the passes of one pipeline run

use tracing::debug;

use crate::config::FilterOptions;
use crate::registry::{EquationCounter, HeaderCounter, Registries};
use crate::utils::error::{FilterWarning, WarningKind};

/// Everything the passes read from and write to while filtering a document.
///
/// A fresh context per document keeps runs independent of each other.
#[derive(Debug, Default)]
pub struct FilterContext {
    /// Filter options
    pub options: FilterOptions,
    /// Numbers assigned so far, by element kind
    pub registries: Registries,
    /// Heading counter stack
    pub headers: HeaderCounter,
    /// Per-section equation counts
    pub equations: EquationCounter,
    /// Figures, tables and theorems seen so far
    pub figure_count: usize,
    pub table_count: usize,
    pub theorem_count: usize,
    /// Collected warnings
    pub warnings: Vec<FilterWarning>,
}

impl FilterContext {
    pub fn new(options: FilterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Record a non-fatal issue.
    pub fn warn(&mut self, warning: FilterWarning) {
        debug!(kind = warning.kind.as_str(), location = ?warning.location, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// `element` had no text leaf to carry `what`.
    pub fn warn_missing_text(&mut self, element: &str, what: &str) {
        self.warn(
            FilterWarning::new(
                WarningKind::MissingText,
                format!("no text to attach {} to", what),
            )
            .with_location(element.to_string()),
        );
    }

    pub fn next_figure(&mut self) -> usize {
        self.figure_count += 1;
        self.figure_count
    }

    pub fn next_table(&mut self) -> usize {
        self.table_count += 1;
        self.table_count
    }

    pub fn next_theorem(&mut self) -> usize {
        self.theorem_count += 1;
        self.theorem_count
    }
}
