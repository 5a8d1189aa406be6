//! Post-order traversal with per-node rewrite hooks.
//!
//! Children are visited before their parent, metadata before the body.
//! Nodes produced by a hook are spliced in place and not walked again.

use crate::{Block, Caption, Inline, MetaValue, Pandoc, Row};

pub enum FilterReturn<T> {
    Unchanged(T),
    Replace(Vec<T>),
}

/// Immediate container of a block handed to [`Filter::block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// Top level of the document body.
    Document,
    /// Top level of a metadata entry, keyed by its top-level name.
    Meta(String),
    Div(String),
    Figure(String),
    /// Lists, quotes, table cells, captions, notes.
    Other,
}

impl Parent {
    /// Identifier of the container, if it has a non-empty one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Parent::Div(id) | Parent::Figure(id) if !id.is_empty() => Some(id.as_str()),
            _ => None,
        }
    }
}

pub trait Filter<C> {
    fn block(&mut self, block: Block, _parent: &Parent, _cx: &mut C) -> FilterReturn<Block> {
        FilterReturn::Unchanged(block)
    }

    fn inline(&mut self, inline: Inline, _cx: &mut C) -> FilterReturn<Inline> {
        FilterReturn::Unchanged(inline)
    }
}

/// Run one full traversal of `doc` through `filter`.
pub fn walk<C, F: Filter<C> + ?Sized>(doc: &mut Pandoc, filter: &mut F, cx: &mut C) {
    for (key, value) in doc.meta.iter_mut() {
        let parent = Parent::Meta(key.clone());
        walk_meta(value, &parent, filter, cx);
    }
    walk_blocks(&mut doc.blocks, &Parent::Document, filter, cx);
}

fn walk_meta<C, F: Filter<C> + ?Sized>(
    value: &mut MetaValue,
    parent: &Parent,
    filter: &mut F,
    cx: &mut C,
) {
    match value {
        MetaValue::MetaMap(map) => {
            for nested in map.values_mut() {
                walk_meta(nested, parent, filter, cx);
            }
        }
        MetaValue::MetaList(items) => {
            for nested in items.iter_mut() {
                walk_meta(nested, parent, filter, cx);
            }
        }
        MetaValue::MetaInlines(inlines) => walk_inlines(inlines, filter, cx),
        MetaValue::MetaBlocks(blocks) => walk_blocks(blocks, parent, filter, cx),
        MetaValue::MetaBool(_) | MetaValue::MetaString(_) => {}
    }
}

fn walk_blocks<C, F: Filter<C> + ?Sized>(
    blocks: &mut Vec<Block>,
    parent: &Parent,
    filter: &mut F,
    cx: &mut C,
) {
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in std::mem::take(blocks) {
        walk_block_children(&mut block, filter, cx);
        match filter.block(block, parent, cx) {
            FilterReturn::Unchanged(block) => out.push(block),
            FilterReturn::Replace(replacement) => out.extend(replacement),
        }
    }
    *blocks = out;
}

fn walk_block_children<C, F: Filter<C> + ?Sized>(block: &mut Block, filter: &mut F, cx: &mut C) {
    match block {
        Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
            walk_inlines(inlines, filter, cx)
        }
        Block::LineBlock(lines) => {
            for line in lines.iter_mut() {
                walk_inlines(line, filter, cx);
            }
        }
        Block::BlockQuote(blocks) => walk_blocks(blocks, &Parent::Other, filter, cx),
        Block::OrderedList(_, items) | Block::BulletList(items) => {
            for item in items.iter_mut() {
                walk_blocks(item, &Parent::Other, filter, cx);
            }
        }
        Block::DefinitionList(entries) => {
            for (term, definitions) in entries.iter_mut() {
                walk_inlines(term, filter, cx);
                for definition in definitions.iter_mut() {
                    walk_blocks(definition, &Parent::Other, filter, cx);
                }
            }
        }
        Block::Table(_, caption, _, head, bodies, foot) => {
            walk_caption(caption, filter, cx);
            walk_rows(&mut head.1, filter, cx);
            for body in bodies.iter_mut() {
                walk_rows(&mut body.2, filter, cx);
                walk_rows(&mut body.3, filter, cx);
            }
            walk_rows(&mut foot.1, filter, cx);
        }
        Block::Figure(attr, caption, content) => {
            walk_caption(caption, filter, cx);
            let parent = Parent::Figure(attr.identifier.clone());
            walk_blocks(content, &parent, filter, cx);
        }
        Block::Div(attr, content) => {
            let parent = Parent::Div(attr.identifier.clone());
            walk_blocks(content, &parent, filter, cx);
        }
        Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => {}
    }
}

fn walk_caption<C, F: Filter<C> + ?Sized>(caption: &mut Caption, filter: &mut F, cx: &mut C) {
    if let Some(short) = caption.short.as_mut() {
        walk_inlines(short, filter, cx);
    }
    walk_blocks(&mut caption.long, &Parent::Other, filter, cx);
}

fn walk_rows<C, F: Filter<C> + ?Sized>(rows: &mut [Row], filter: &mut F, cx: &mut C) {
    for row in rows.iter_mut() {
        for cell in row.1.iter_mut() {
            walk_blocks(&mut cell.4, &Parent::Other, filter, cx);
        }
    }
}

fn walk_inlines<C, F: Filter<C> + ?Sized>(inlines: &mut Vec<Inline>, filter: &mut F, cx: &mut C) {
    let mut out = Vec::with_capacity(inlines.len());
    for mut inline in std::mem::take(inlines) {
        walk_inline_children(&mut inline, filter, cx);
        match filter.inline(inline, cx) {
            FilterReturn::Unchanged(inline) => out.push(inline),
            FilterReturn::Replace(replacement) => out.extend(replacement),
        }
    }
    *inlines = out;
}

fn walk_inline_children<C, F: Filter<C> + ?Sized>(
    inline: &mut Inline,
    filter: &mut F,
    cx: &mut C,
) {
    match inline {
        Inline::Emph(content)
        | Inline::Underline(content)
        | Inline::Strong(content)
        | Inline::Strikeout(content)
        | Inline::Superscript(content)
        | Inline::Subscript(content)
        | Inline::SmallCaps(content)
        | Inline::Quoted(_, content)
        | Inline::Link(_, content, _)
        | Inline::Image(_, content, _)
        | Inline::Span(_, content) => walk_inlines(content, filter, cx),
        Inline::Cite(citations, content) => {
            for citation in citations.iter_mut() {
                walk_inlines(&mut citation.citation_prefix, filter, cx);
                walk_inlines(&mut citation.citation_suffix, filter, cx);
            }
            walk_inlines(content, filter, cx);
        }
        Inline::Note(blocks) => walk_blocks(blocks, &Parent::Other, filter, cx),
        Inline::Str(_)
        | Inline::Code(..)
        | Inline::Space
        | Inline::SoftBreak
        | Inline::LineBreak
        | Inline::Math(..)
        | Inline::RawInline(..) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attr, MetaValue};
    use pretty_assertions::assert_eq;

    /// Records visit order and upper-cases every `Str`.
    #[derive(Default)]
    struct Recorder {
        order: Vec<String>,
    }

    impl Filter<Vec<Parent>> for Recorder {
        fn block(
            &mut self,
            block: Block,
            parent: &Parent,
            parents: &mut Vec<Parent>,
        ) -> FilterReturn<Block> {
            let tag = match &block {
                Block::Para(_) => "Para",
                Block::Div(..) => "Div",
                Block::Header(..) => "Header",
                _ => "Block",
            };
            self.order.push(tag.to_string());
            parents.push(parent.clone());
            FilterReturn::Unchanged(block)
        }

        fn inline(&mut self, inline: Inline, _cx: &mut Vec<Parent>) -> FilterReturn<Inline> {
            match inline {
                Inline::Str(s) => {
                    self.order.push(format!("Str:{}", s));
                    FilterReturn::Unchanged(Inline::Str(s.to_uppercase()))
                }
                other => FilterReturn::Unchanged(other),
            }
        }
    }

    #[test]
    fn test_children_visited_before_parent() {
        let mut doc = Pandoc::new(vec![Block::Div(
            Attr::with_id("box"),
            vec![Block::Para(vec![
                Inline::str("a"),
                Inline::Emph(vec![Inline::str("b")]),
            ])],
        )]);
        let mut recorder = Recorder::default();
        let mut parents = Vec::new();
        walk(&mut doc, &mut recorder, &mut parents);

        assert_eq!(recorder.order, vec!["Str:a", "Str:b", "Para", "Div"]);
        assert_eq!(parents, vec![Parent::Div("box".to_string()), Parent::Document]);
        let Block::Div(_, content) = &doc.blocks[0] else {
            panic!("expected Div");
        };
        assert_eq!(
            content[0],
            Block::Para(vec![Inline::str("A"), Inline::Emph(vec![Inline::str("B")])])
        );
    }

    #[test]
    fn test_metadata_walked_before_body() {
        let mut doc = Pandoc::new(vec![Block::Para(vec![Inline::str("body")])]).with_meta(
            "abstract",
            MetaValue::MetaBlocks(vec![Block::Para(vec![Inline::str("summary")])]),
        );
        let mut recorder = Recorder::default();
        let mut parents = Vec::new();
        walk(&mut doc, &mut recorder, &mut parents);

        assert_eq!(recorder.order, vec!["Str:summary", "Para", "Str:body", "Para"]);
        assert_eq!(
            parents,
            vec![Parent::Meta("abstract".to_string()), Parent::Document]
        );
    }

    struct Splitter;

    impl Filter<usize> for Splitter {
        fn block(
            &mut self,
            block: Block,
            _parent: &Parent,
            calls: &mut usize,
        ) -> FilterReturn<Block> {
            *calls += 1;
            match block {
                Block::Div(..) => FilterReturn::Replace(vec![Block::HorizontalRule, block]),
                other => FilterReturn::Unchanged(other),
            }
        }
    }

    #[test]
    fn test_replacement_spliced_without_rewalk() {
        let mut doc = Pandoc::new(vec![Block::Div(Attr::with_id("refs"), Vec::new())]);
        let mut calls = 0;
        walk(&mut doc, &mut Splitter, &mut calls);

        assert_eq!(calls, 1);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0], Block::HorizontalRule);
    }

    #[test]
    fn test_empty_identifier_is_absent() {
        assert_eq!(Parent::Div(String::new()).identifier(), None);
        assert_eq!(Parent::Figure("fig".to_string()).identifier(), Some("fig"));
        assert_eq!(Parent::Document.identifier(), None);
    }
}
