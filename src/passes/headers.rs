//! Hierarchical heading numbers ("2.1  Method").

use texdocx_ast::{Attr, Block, Filter, FilterReturn, Inline, Parent};
use tracing::debug;

use super::{Pass, RegistryId};
use crate::context::FilterContext;
use crate::locate::FirstStr;

/// Gap between a heading number and its text.
const NUMBER_SEPARATOR: &str = "  ";

pub struct NumberHeaders;

impl Filter<FilterContext> for NumberHeaders {
    fn block(
        &mut self,
        mut block: Block,
        _parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if let Block::Header(level, attr, content) = &mut block {
            number_header(*level, attr, content, cx);
        }
        FilterReturn::Unchanged(block)
    }
}

impl Pass for NumberHeaders {
    fn name(&self) -> &'static str {
        "header-numbering"
    }

    fn provides(&self) -> &'static [RegistryId] {
        &[RegistryId::Headers]
    }
}

fn number_header(level: usize, attr: &Attr, content: &mut [Inline], cx: &mut FilterContext) {
    // only top-level unnumbered headings are skipped; deeper ones keep counting
    if level == 1 && attr.has_class(&cx.options.unnumbered_class) {
        debug!(id = %attr.identifier, "unnumbered heading left alone");
        return;
    }

    let number = cx.headers.advance(level);
    if attr.identifier.is_empty() {
        debug!(%number, "heading without identifier");
    } else if !cx
        .registries
        .headers
        .register(attr.identifier.clone(), number.clone())
    {
        debug!(id = %attr.identifier, %number, "duplicate heading identifier ignored");
    }

    match content.first_str_mut() {
        Some(text) => text.insert_str(0, &format!("{}{}", number, NUMBER_SEPARATOR)),
        None => cx.warn_missing_text(
            &format!("heading {}", describe(attr)),
            &format!("number {}", number),
        ),
    }
}

fn describe(attr: &Attr) -> String {
    if attr.identifier.is_empty() {
        "(no identifier)".to_string()
    } else {
        format!("#{}", attr.identifier)
    }
}
