//! `\ref` and `\eqref` resolution.
//!
//! References arrive in one of two shapes: a raw TeX inline holding the
//! directive, or the `Link` Pandoc's LaTeX reader builds, tagged with
//! `reference-type` and `reference` attributes. A resolved raw directive is
//! replaced by the number as plain text; a resolved link keeps its target
//! and gets the number as its text. Unresolved references stay as they are.

use lazy_static::lazy_static;
use regex::Regex;
use texdocx_ast::{Filter, FilterReturn, Inline};
use tracing::debug;

use super::{Pass, RegistryId};
use crate::context::FilterContext;
use crate::registry::LabelKind;
use crate::utils::error::{FilterWarning, WarningKind};

lazy_static! {
    /// Raw text that is exactly `\ref{NAME}`
    static ref REF_PATTERN: Regex = Regex::new(r"^\\ref\{([^}]*)\}$").expect("ref pattern");
    /// `\eqref{NAME}` anywhere in the raw text
    static ref EQREF_PATTERN: Regex = Regex::new(r"\\eqref\{([^}]*)\}").expect("eqref pattern");
}

/// Link attribute naming the directive Pandoc converted
const REFERENCE_TYPE: &str = "reference-type";
/// Link attribute holding the referenced label
const REFERENCE: &str = "reference";

/// Which directive a resolver handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Ref,
    EqRef,
}

impl Directive {
    fn reference_type(self) -> &'static str {
        match self {
            Directive::Ref => "ref",
            Directive::EqRef => "eqref",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            Directive::Ref => &*REF_PATTERN,
            Directive::EqRef => &*EQREF_PATTERN,
        }
    }

    fn lookup(self, name: &str, cx: &FilterContext) -> Option<(LabelKind, String)> {
        let found = match self {
            Directive::Ref => cx.registries.resolve(name),
            Directive::EqRef => cx
                .registries
                .resolve_equation(name)
                .map(|number| (LabelKind::Equation, number)),
        };
        found.map(|(kind, number)| (kind, number.to_string()))
    }
}

/// Label a reference inline points at, if it is one this directive handles.
fn referenced_label(directive: Directive, inline: &Inline) -> Option<String> {
    match inline {
        Inline::RawInline(_, text) => directive
            .pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        Inline::Link(attr, _, _)
            if attr.get(REFERENCE_TYPE) == Some(directive.reference_type()) =>
        {
            attr.get(REFERENCE).map(str::to_string)
        }
        _ => None,
    }
}

fn resolve(directive: Directive, inline: Inline, cx: &mut FilterContext) -> FilterReturn<Inline> {
    let Some(name) = referenced_label(directive, &inline) else {
        return FilterReturn::Unchanged(inline);
    };

    let Some((kind, number)) = directive.lookup(&name, cx) else {
        cx.warn(
            FilterWarning::new(
                WarningKind::UnresolvedReference,
                format!("\\{} target was never numbered", directive.reference_type()),
            )
            .with_location(name),
        );
        return FilterReturn::Unchanged(inline);
    };

    debug!(label = %name, %kind, %number, "resolved reference");
    match inline {
        Inline::Link(attr, _, target) => {
            FilterReturn::Replace(vec![Inline::Link(attr, vec![Inline::Str(number)], target)])
        }
        _ => FilterReturn::Replace(vec![Inline::Str(number)]),
    }
}

/// Resolves `\ref` against headings, figures, tables and theorems.
pub struct ResolveReferences;

impl Filter<FilterContext> for ResolveReferences {
    fn inline(&mut self, inline: Inline, cx: &mut FilterContext) -> FilterReturn<Inline> {
        resolve(Directive::Ref, inline, cx)
    }
}

impl Pass for ResolveReferences {
    fn name(&self) -> &'static str {
        "general-ref-resolution"
    }

    fn requires(&self) -> &'static [RegistryId] {
        &[
            RegistryId::Headers,
            RegistryId::Figures,
            RegistryId::Tables,
            RegistryId::Theorems,
        ]
    }
}

/// Resolves `\eqref` against numbered equations.
pub struct ResolveEquationReferences;

impl Filter<FilterContext> for ResolveEquationReferences {
    fn inline(&mut self, inline: Inline, cx: &mut FilterContext) -> FilterReturn<Inline> {
        resolve(Directive::EqRef, inline, cx)
    }
}

impl Pass for ResolveEquationReferences {
    fn name(&self) -> &'static str {
        "equation-ref-resolution"
    }

    fn requires(&self) -> &'static [RegistryId] {
        &[RegistryId::Equations]
    }
}
