//! Theorem-like environments.

use texdocx_ast::{Attr, Block, Filter, FilterReturn, Parent};
use tracing::debug;

use super::{Pass, RegistryId};
use crate::context::FilterContext;
use crate::locate::FindLabel;
use crate::registry::TheoremKey;

/// Numbers every Div with the theorem class.
///
/// The key is the first raw `\label{..}` inside the Div, else the Div's own
/// identifier, else the theorem's position. The Div itself is not changed.
pub struct ExtractTheorems;

impl Filter<FilterContext> for ExtractTheorems {
    fn block(
        &mut self,
        block: Block,
        _parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if let Block::Div(attr, content) = &block {
            if attr.has_class(&cx.options.theorem_class) {
                register_theorem(attr, content, cx);
            }
        }
        FilterReturn::Unchanged(block)
    }
}

impl Pass for ExtractTheorems {
    fn name(&self) -> &'static str {
        "theorem-extraction"
    }

    fn provides(&self) -> &'static [RegistryId] {
        &[RegistryId::Theorems]
    }
}

fn register_theorem(attr: &Attr, content: &[Block], cx: &mut FilterContext) {
    let position = cx.next_theorem();
    let key = content
        .find_label()
        .or_else(|| (!attr.identifier.is_empty()).then(|| attr.identifier.clone()))
        .map_or(TheoremKey::Position(position), TheoremKey::Label);

    debug!(key = %key, number = position, "theorem");
    if !cx.registries.theorems.register(key, position.to_string()) {
        debug!(number = position, "duplicate theorem label ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use texdocx_ast::{walk, Inline, Pandoc};

    fn theorem(id: &str, inlines: Vec<Inline>) -> Block {
        Block::Div(Attr::with_id(id).class("theorem"), vec![Block::Para(inlines)])
    }

    fn run(blocks: Vec<Block>) -> (Pandoc, FilterContext) {
        let mut doc = Pandoc::new(blocks);
        let mut cx = FilterContext::default();
        walk(&mut doc, &mut ExtractTheorems, &mut cx);
        (doc, cx)
    }

    #[test]
    fn test_label_directive_is_the_key() {
        let (_, cx) = run(vec![
            theorem("", vec![Inline::raw_tex("\\label{thm:main}"), Inline::str("Every")]),
            theorem("", vec![Inline::raw_tex("\\label{thm:other}")]),
        ]);
        assert_eq!(
            cx.registries.theorems.get(&TheoremKey::Label("thm:other".to_string())),
            Some("2")
        );
        assert_eq!(cx.registries.resolve("thm:main").map(|(_, n)| n), Some("1"));
    }

    #[test]
    fn test_div_identifier_used_without_directive() {
        let (_, cx) = run(vec![theorem("thm:pandoc", vec![Inline::str("Claim")])]);
        assert_eq!(cx.registries.resolve("thm:pandoc").map(|(_, n)| n), Some("1"));
    }

    #[test]
    fn test_unlabelled_theorem_keyed_by_position() {
        let (_, cx) = run(vec![
            theorem("", vec![Inline::str("First")]),
            theorem("", vec![Inline::raw_tex("\\label{thm:b}")]),
        ]);
        assert_eq!(cx.registries.theorems.get(&TheoremKey::Position(1)), Some("1"));
        assert_eq!(cx.registries.theorems.len(), 2);
    }

    #[test]
    fn test_other_divs_and_tree_unchanged() {
        let blocks = vec![
            Block::Div(Attr::default().class("proof"), vec![]),
            theorem("t", vec![Inline::str("Body")]),
        ];
        let (doc, cx) = run(blocks.clone());
        assert_eq!(doc.blocks, blocks);
        assert_eq!(cx.theorem_count, 1);
    }
}
