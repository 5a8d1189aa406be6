//! Figure and table numbering.
//!
//! Both passes count their element in document order and prepend
//! "Figure N: " / "Table N: " to the caption. Figures are registered under
//! their own identifier. Pandoc wraps a labelled LaTeX table in a Div or
//! Figure carrying the label, so tables are registered under the parent's
//! identifier, falling back to the table's own. A Figure holding nothing
//! but tables is such a wrapper and is not counted as a figure.

use texdocx_ast::{Block, Caption, Filter, FilterReturn, Parent};
use tracing::debug;

use super::{Pass, RegistryId};
use crate::context::FilterContext;
use crate::locate::FirstStr;
use crate::registry::LabelTable;

pub struct NumberFigures;

impl Filter<FilterContext> for NumberFigures {
    fn block(
        &mut self,
        mut block: Block,
        _parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if let Block::Figure(attr, caption, content) = &mut block {
            if is_table_wrapper(content) {
                debug!(id = %attr.identifier, "figure wraps a table; left to table numbering");
                return FilterReturn::Unchanged(block);
            }
            let number = cx.next_figure().to_string();
            register(&mut cx.registries.figures, &attr.identifier, &number, "figure");
            label_caption(caption, &format!("Figure {}: ", number), "figure", &number, cx);
        }
        FilterReturn::Unchanged(block)
    }
}

impl Pass for NumberFigures {
    fn name(&self) -> &'static str {
        "figure-numbering"
    }

    fn provides(&self) -> &'static [RegistryId] {
        &[RegistryId::Figures]
    }
}

pub struct NumberTables;

impl Filter<FilterContext> for NumberTables {
    fn block(
        &mut self,
        mut block: Block,
        parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if let Block::Table(attr, caption, ..) = &mut block {
            let number = cx.next_table().to_string();
            let key = parent.identifier().unwrap_or(&attr.identifier);
            register(&mut cx.registries.tables, key, &number, "table");
            label_caption(caption, &format!("Table {}: ", number), "table", &number, cx);
        }
        FilterReturn::Unchanged(block)
    }
}

impl Pass for NumberTables {
    fn name(&self) -> &'static str {
        "table-numbering"
    }

    fn provides(&self) -> &'static [RegistryId] {
        &[RegistryId::Tables]
    }
}

fn is_table_wrapper(content: &[Block]) -> bool {
    !content.is_empty() && content.iter().all(|block| matches!(block, Block::Table(..)))
}

fn register(table: &mut LabelTable, key: &str, number: &str, kind: &str) {
    if key.is_empty() {
        debug!(kind, number, "unlabelled element numbered");
    } else if table.register(key.to_string(), number) {
        debug!(kind, key, number, "registered");
    } else {
        debug!(kind, key, number, "duplicate label ignored");
    }
}

fn label_caption(
    caption: &mut Caption,
    prefix: &str,
    kind: &str,
    number: &str,
    cx: &mut FilterContext,
) {
    match caption.first_str_mut() {
        Some(text) => text.insert_str(0, prefix),
        None => cx.warn_missing_text(
            &format!("{} {} caption", kind, number),
            &format!("number {}", number),
        ),
    }
}
