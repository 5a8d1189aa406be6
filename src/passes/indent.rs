//! First-line paragraph indentation.

use texdocx_ast::{Block, Filter, FilterReturn, Parent};

use super::Pass;
use crate::context::FilterContext;
use crate::locate::FirstStr;

/// Metadata entry whose paragraphs are indented like the body's.
const ABSTRACT_KEY: &str = "abstract";

pub struct IndentParagraphs;

impl Filter<FilterContext> for IndentParagraphs {
    fn block(
        &mut self,
        mut block: Block,
        parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if !cx.options.indent_paragraphs || !is_indentable(parent) {
            return FilterReturn::Unchanged(block);
        }
        if let Block::Para(content) = &mut block {
            match content.first_str_mut() {
                Some(text) => text.insert_str(0, &cx.options.indent),
                None => cx.warn_missing_text("paragraph", "the first-line indent"),
            }
        }
        FilterReturn::Unchanged(block)
    }
}

impl Pass for IndentParagraphs {
    fn name(&self) -> &'static str {
        "paragraph-indentation"
    }
}

fn is_indentable(parent: &Parent) -> bool {
    match parent {
        Parent::Document => true,
        Parent::Meta(key) => key == ABSTRACT_KEY,
        _ => false,
    }
}
