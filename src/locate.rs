//! Depth-first, pre-order searches inside a block or inline subtree.
//!
//! [`FirstStr`] finds the human-written text a pass prepends a number to;
//! [`FindLabel`] recovers a `\label{..}` the LaTeX reader left as raw TeX.
//! Both return `None` when the subtree has nothing to offer and callers
//! must handle that case.

use lazy_static::lazy_static;
use regex::Regex;
use texdocx_ast::{Block, Caption, Inline, Row};

lazy_static! {
    /// `\label{NAME}`, NAME ending at the first closing brace
    pub static ref LABEL_PATTERN: Regex =
        Regex::new(r"\\label\{([^}]*)\}").expect("label pattern");
}

/// Extract NAME from the first `\label{NAME}` in `text`.
pub fn label_in(text: &str) -> Option<&str> {
    LABEL_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// =============================================================================
// First text leaf
// =============================================================================

pub trait FirstStr {
    /// Text of the first `Str` leaf, in document order.
    fn first_str_mut(&mut self) -> Option<&mut String>;
}

impl FirstStr for [Inline] {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        self.iter_mut().find_map(|inline| inline.first_str_mut())
    }
}

impl FirstStr for [Block] {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        self.iter_mut().find_map(|block| block.first_str_mut())
    }
}

impl FirstStr for [Row] {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        self.iter_mut()
            .flat_map(|row| row.1.iter_mut())
            .find_map(|cell| cell.4.first_str_mut())
    }
}

impl FirstStr for Caption {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        self.long.first_str_mut()
    }
}

impl FirstStr for Inline {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        match self {
            Inline::Str(text) => Some(text),
            Inline::Emph(content)
            | Inline::Underline(content)
            | Inline::Strong(content)
            | Inline::Strikeout(content)
            | Inline::Superscript(content)
            | Inline::Subscript(content)
            | Inline::SmallCaps(content)
            | Inline::Quoted(_, content)
            | Inline::Cite(_, content)
            | Inline::Link(_, content, _)
            | Inline::Image(_, content, _)
            | Inline::Span(_, content) => content.first_str_mut(),
            Inline::Note(blocks) => blocks.first_str_mut(),
            Inline::Code(..)
            | Inline::Space
            | Inline::SoftBreak
            | Inline::LineBreak
            | Inline::Math(..)
            | Inline::RawInline(..) => None,
        }
    }
}

impl FirstStr for Block {
    fn first_str_mut(&mut self) -> Option<&mut String> {
        match self {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
                inlines.first_str_mut()
            }
            Block::LineBlock(lines) => lines.iter_mut().find_map(|line| line.first_str_mut()),
            Block::BlockQuote(blocks) | Block::Div(_, blocks) => blocks.first_str_mut(),
            Block::OrderedList(_, items) | Block::BulletList(items) => {
                items.iter_mut().find_map(|item| item.first_str_mut())
            }
            Block::DefinitionList(entries) => entries.iter_mut().find_map(|(term, definitions)| {
                term.first_str_mut().or_else(|| {
                    definitions
                        .iter_mut()
                        .find_map(|definition| definition.first_str_mut())
                })
            }),
            Block::Figure(_, caption, content) => content
                .first_str_mut()
                .or_else(|| caption.first_str_mut()),
            Block::Table(_, caption, _, head, bodies, foot) => caption
                .first_str_mut()
                .or_else(|| head.1.first_str_mut())
                .or_else(|| {
                    bodies
                        .iter_mut()
                        .find_map(|body| body.2.first_str_mut().or_else(|| body.3.first_str_mut()))
                })
                .or_else(|| foot.1.first_str_mut()),
            Block::CodeBlock(..) | Block::RawBlock(..) | Block::HorizontalRule => None,
        }
    }
}

// =============================================================================
// Label directive
// =============================================================================

pub trait FindLabel {
    /// Name of the first raw `\label{..}` directive in the subtree.
    fn find_label(&self) -> Option<String>;
}

impl FindLabel for [Inline] {
    fn find_label(&self) -> Option<String> {
        self.iter().find_map(FindLabel::find_label)
    }
}

impl FindLabel for [Block] {
    fn find_label(&self) -> Option<String> {
        self.iter().find_map(FindLabel::find_label)
    }
}

impl FindLabel for Inline {
    fn find_label(&self) -> Option<String> {
        match self {
            Inline::RawInline(_, text) => label_in(text).map(str::to_string),
            Inline::Emph(content)
            | Inline::Underline(content)
            | Inline::Strong(content)
            | Inline::Strikeout(content)
            | Inline::Superscript(content)
            | Inline::Subscript(content)
            | Inline::SmallCaps(content)
            | Inline::Quoted(_, content)
            | Inline::Cite(_, content)
            | Inline::Link(_, content, _)
            | Inline::Image(_, content, _)
            | Inline::Span(_, content) => content.find_label(),
            Inline::Note(blocks) => blocks.find_label(),
            Inline::Str(_)
            | Inline::Code(..)
            | Inline::Space
            | Inline::SoftBreak
            | Inline::LineBreak
            | Inline::Math(..) => None,
        }
    }
}

impl FindLabel for Block {
    fn find_label(&self) -> Option<String> {
        match self {
            Block::Plain(inlines) | Block::Para(inlines) | Block::Header(_, _, inlines) => {
                inlines.find_label()
            }
            Block::LineBlock(lines) => lines.iter().find_map(|line| line.find_label()),
            Block::BlockQuote(blocks) | Block::Div(_, blocks) | Block::Figure(_, _, blocks) => {
                blocks.find_label()
            }
            Block::OrderedList(_, items) | Block::BulletList(items) => {
                items.iter().find_map(|item| item.find_label())
            }
            Block::DefinitionList(entries) => entries.iter().find_map(|(term, definitions)| {
                term.find_label()
                    .or_else(|| definitions.iter().find_map(|d| d.find_label()))
            }),
            Block::Table(..)
            | Block::CodeBlock(..)
            | Block::RawBlock(..)
            | Block::HorizontalRule => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use texdocx_ast::{Attr, Target};

    #[test]
    fn test_first_str_skips_non_text_leaves() {
        let mut block = Block::Para(vec![
            Inline::display_math("x"),
            Inline::Space,
            Inline::Strong(vec![Inline::str("Bold")]),
            Inline::str("later"),
        ]);
        assert_eq!(block.first_str_mut().map(|s| s.as_str()), Some("Bold"));
    }

    #[test]
    fn test_first_str_mutation_lands_in_tree() {
        let mut blocks = vec![Block::Div(
            Attr::default(),
            vec![Block::Plain(vec![Inline::Link(
                Attr::default(),
                vec![Inline::str("site")],
                Target::new("https://example.org"),
            )])],
        )];
        if let Some(text) = blocks.first_str_mut() {
            text.insert_str(0, "> ");
        }
        assert_eq!(
            blocks[0],
            Block::Div(
                Attr::default(),
                vec![Block::Plain(vec![Inline::Link(
                    Attr::default(),
                    vec![Inline::str("> site")],
                    Target::new("https://example.org"),
                )])],
            )
        );
    }

    #[test]
    fn test_first_str_absent() {
        let mut caption = Caption::new(vec![Block::Plain(vec![Inline::Space])]);
        assert!(caption.first_str_mut().is_none());
        assert!(Block::HorizontalRule.first_str_mut().is_none());
    }

    #[test]
    fn test_find_label_nested() {
        let block = Block::Div(
            Attr::default().class("theorem"),
            vec![Block::Para(vec![
                Inline::str("Every"),
                Inline::Span(Attr::default(), vec![Inline::raw_tex("\\label{thm:every}")]),
            ])],
        );
        assert_eq!(block.find_label(), Some("thm:every".to_string()));
    }

    #[test]
    fn test_find_label_ignores_refs() {
        let block = Block::Para(vec![Inline::raw_tex("\\ref{thm:every}")]);
        assert_eq!(block.find_label(), None);
    }

    #[test]
    fn test_label_stops_at_first_brace() {
        assert_eq!(label_in("a = b \\label{eq:one} c^{2}"), Some("eq:one"));
        assert_eq!(label_in("no label here"), None);
    }
}
