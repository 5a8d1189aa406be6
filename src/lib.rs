//! # texdocx
//!
//! Pandoc JSON filter for LaTeX papers converted to DOCX.
//!
//! Word documents produced by Pandoc lose LaTeX's automatic numbering. This
//! filter restores it in the document tree before Pandoc renders it:
//!
//! - hierarchical heading numbers ("2.1  Method")
//! - "Figure N: " and "Table N: " caption prefixes
//! - theorem numbers
//! - "(section.n)" equation numbers with a Word numbering tag
//! - `\ref` / `\eqref` replaced by the numbers above
//! - image paths relocated and widths dropped
//! - a "References" heading before the bibliography
//! - optional first-line paragraph indentation
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use texdocx::{filter_json, FilterOptions};
//!
//! let input = std::fs::read_to_string("paper.json").unwrap();
//! let output = filter_json(&input, FilterOptions::for_target("docx")).unwrap();
//! for warning in &output.warnings {
//!     eprintln!("{}", warning);
//! }
//! println!("{}", output.to_json().unwrap());
//! ```
//!
//! As a filter: `pandoc paper.tex --filter texdocx -o paper.docx`.

pub mod config;
pub mod context;
pub mod locate;
pub mod passes;
pub mod pipeline;
pub mod registry;
pub mod utils;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use texdocx_ast as ast;

pub use config::{FilterOptions, OutputFormat};
pub use context::FilterContext;
pub use pipeline::{apply_filters, filter_json, FilterOutput, Pipeline};
pub use registry::{LabelKind, LabelTable, Registries, TheoremKey};
pub use utils::error::{FilterError, FilterResult, FilterWarning, WarningKind};
pub use utils::report::FilterReport;
