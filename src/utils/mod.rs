//! Utility modules
//!
//! - Error and warning types
//! - Run reports

pub mod error;
pub mod report;

// Re-export commonly used items
pub use error::{DiagnosticSeverity, FilterError, FilterResult, FilterWarning, WarningKind};
pub use report::{FilterReport, LabelRecord};
