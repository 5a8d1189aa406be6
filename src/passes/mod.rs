//! Tree-rewrite passes
//!
//! Each pass is one full traversal of the document doing one job. Passes
//! never talk to each other directly: numbering passes fill the registries
//! in [`FilterContext`], resolving passes read them.

pub mod crossref;
pub mod equations;
pub mod floats;
pub mod headers;
pub mod images;
pub mod indent;
pub mod references;
pub mod theorems;

use std::fmt;

use texdocx_ast::{Filter, Inline};

use crate::context::FilterContext;

pub use crossref::{ResolveEquationReferences, ResolveReferences};
pub use equations::NumberEquations;
pub use floats::{NumberFigures, NumberTables};
pub use headers::NumberHeaders;
pub use images::AdjustImages;
pub use indent::IndentParagraphs;
pub use references::ReferencesHeading;
pub use theorems::ExtractTheorems;

/// A registry a pass fills or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryId {
    Headers,
    Figures,
    Tables,
    Theorems,
    Equations,
}

impl RegistryId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryId::Headers => "header",
            RegistryId::Figures => "figure",
            RegistryId::Tables => "table",
            RegistryId::Theorems => "theorem",
            RegistryId::Equations => "equation",
        }
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Pass: Filter<FilterContext> {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Registries this pass writes.
    fn provides(&self) -> &'static [RegistryId] {
        &[]
    }

    /// Registries this pass reads; they must be filled by an earlier pass.
    fn requires(&self) -> &'static [RegistryId] {
        &[]
    }
}

/// Split plain text into `Str`/`Space` inlines.
pub(crate) fn text_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for word in text.split_whitespace() {
        if !inlines.is_empty() {
            inlines.push(Inline::Space);
        }
        inlines.push(Inline::str(word));
    }
    inlines
}
