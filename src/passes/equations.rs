//! Display equation numbering, "(section.n)" per top-level section.

use texdocx_ast::{Block, Filter, FilterReturn, Inline, MathType, Parent};
use tracing::debug;

use super::{Pass, RegistryId};
use crate::context::FilterContext;
use crate::locate::LABEL_PATTERN;

/// Numbers labelled display equations.
///
/// Every top-level heading opens a section, numbered or not. The `\label`
/// directive is removed from the math and the target's numbering tag is
/// appended. Inline math and unlabelled equations are left alone.
pub struct NumberEquations;

impl Filter<FilterContext> for NumberEquations {
    fn block(
        &mut self,
        block: Block,
        _parent: &Parent,
        cx: &mut FilterContext,
    ) -> FilterReturn<Block> {
        if let Block::Header(1, ..) = block {
            cx.equations.open_section();
        }
        FilterReturn::Unchanged(block)
    }

    fn inline(&mut self, mut inline: Inline, cx: &mut FilterContext) -> FilterReturn<Inline> {
        if let Inline::Math(MathType::DisplayMath, text) = &mut inline {
            number_equation(text, cx);
        }
        FilterReturn::Unchanged(inline)
    }
}

impl Pass for NumberEquations {
    fn name(&self) -> &'static str {
        "equation-numbering"
    }

    fn provides(&self) -> &'static [RegistryId] {
        &[RegistryId::Equations]
    }
}

fn number_equation(text: &mut String, cx: &mut FilterContext) {
    let (directive, label) = match LABEL_PATTERN.captures(text) {
        Some(caps) => (caps[0].to_string(), caps[1].to_string()),
        None => return,
    };

    let number = cx.equations.next();
    debug!(%label, %number, "equation");
    if !cx.registries.equations.register(label, number.clone()) {
        debug!(%number, "duplicate equation label ignored");
    }

    *text = text.replace(&directive, "");
    text.push_str(&cx.options.target.equation_tag(&number));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterOptions, OutputFormat};
    use pretty_assertions::assert_eq;
    use texdocx_ast::{walk, Attr, Pandoc};

    fn section(id: &str) -> Block {
        Block::header(1, Attr::with_id(id), vec![Inline::str(id)])
    }

    fn equation(tex: &str) -> Block {
        Block::Para(vec![Inline::display_math(tex)])
    }

    fn math_texts(doc: &Pandoc) -> Vec<String> {
        doc.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Para(inlines) => match inlines.first() {
                    Some(Inline::Math(_, text)) => Some(text.clone()),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    fn run(blocks: Vec<Block>, target: OutputFormat) -> (Pandoc, FilterContext) {
        let mut doc = Pandoc::new(blocks);
        let mut cx = FilterContext::new(FilterOptions {
            target,
            ..FilterOptions::default()
        });
        walk(&mut doc, &mut NumberEquations, &mut cx);
        (doc, cx)
    }

    #[test]
    fn test_numbers_restart_per_section() {
        let (doc, cx) = run(
            vec![
                section("a"),
                equation("E = mc^2 \\label{eq:energy}"),
                section("b"),
                equation("a^2 + b^2 = c^2\\label{eq:pythagoras}"),
                equation("x"),
                equation("e^{i\\pi} = -1 \\label{eq:euler}"),
            ],
            OutputFormat::Docx,
        );
        assert_eq!(
            math_texts(&doc),
            vec![
                "E = mc^2  \\#(1.1)",
                "a^2 + b^2 = c^2 \\#(2.1)",
                "x",
                "e^{i\\pi} = -1  \\#(2.2)",
            ]
        );
        assert_eq!(cx.registries.equations.get("eq:euler"), Some("(2.2)"));
    }

    #[test]
    fn test_subsections_do_not_open_sections() {
        let sub = Block::header(2, Attr::with_id("sub"), vec![Inline::str("Sub")]);
        let (_, cx) = run(
            vec![section("a"), sub, equation("y\\label{eq:y}")],
            OutputFormat::Docx,
        );
        assert_eq!(cx.registries.equations.get("eq:y"), Some("(1.1)"));
        assert_eq!(cx.equations.sections(), 1);
    }

    #[test]
    fn test_equation_before_any_section() {
        let (_, cx) = run(vec![equation("z\\label{eq:z}")], OutputFormat::Docx);
        assert_eq!(cx.registries.equations.get("eq:z"), Some("(0.1)"));
    }

    #[test]
    fn test_tag_follows_target_format() {
        let blocks = vec![section("a"), equation("y\\label{eq:y}")];
        let (doc, _) = run(blocks.clone(), OutputFormat::Latex);
        assert_eq!(math_texts(&doc), vec!["y\\tag{1.1}"]);
        let (doc, _) = run(blocks, OutputFormat::Other);
        assert_eq!(math_texts(&doc), vec!["y\\qquad (1.1)"]);
    }

    #[test]
    fn test_inline_math_untouched() {
        let inline = Inline::Math(MathType::InlineMath, "x\\label{eq:x}".to_string());
        let (doc, cx) = run(vec![Block::Para(vec![inline.clone()])], OutputFormat::Docx);
        assert_eq!(doc.blocks, vec![Block::Para(vec![inline])]);
        assert!(cx.registries.equations.is_empty());
    }
}
