//! Heading in front of the generated bibliography.

use texdocx_ast::{Attr, Block, Filter, FilterReturn, Parent};
use tracing::debug;

use super::{text_inlines, Pass};
use crate::context::FilterContext;

/// Puts a level-1 "References" heading before the bibliography Div.
///
/// The heading carries no `unnumbered` class, so when this pass runs after
/// [`NumberHeaders`](super::NumberHeaders) it stays unnumbered and is not
/// registered as a `\ref` target.
pub struct ReferencesHeading;

impl Filter<FilterContext> for ReferencesHeading {
    fn block(
        &mut self,
        block: Block,
        _parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        let is_bibliography = matches!(
            &block,
            Block::Div(attr, _) if attr.identifier == cx.options.bibliography_id
        );
        if !is_bibliography {
            return FilterReturn::Unchanged(block);
        }

        debug!(id = %cx.options.bibliography_id, "inserting references heading");
        let heading = Block::header(
            1,
            Attr::with_id(cx.options.references_id.clone()),
            text_inlines(&cx.options.references_title),
        );
        FilterReturn::Replace(vec![heading, block])
    }
}

impl Pass for ReferencesHeading {
    fn name(&self) -> &'static str {
        "reference-heading-injection"
    }
}
