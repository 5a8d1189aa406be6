//! Pandoc JSON document tree.
//!
//! Mirrors `pandoc-types` 1.23 closely enough to round-trip the documents
//! Pandoc 3.x hands to a JSON filter. Node payloads use Pandoc's
//! `{"t": tag, "c": contents}` encoding.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod walk;

pub use walk::{walk, Filter, FilterReturn, Parent};

/// API version written into documents built from scratch.
pub const API_VERSION: [u32; 3] = [1, 23, 1];

/// Oldest API minor version with a `Figure` block.
const MIN_API_MINOR: u32 = 23;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pandoc {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: Vec<u32>,
    pub meta: IndexMap<String, MetaValue>,
    pub blocks: Vec<Block>,
}

impl Pandoc {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            api_version: API_VERSION.to_vec(),
            meta: IndexMap::new(),
            blocks,
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: MetaValue) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn from_json(input: &str) -> Result<Self, AstError> {
        serde_json::from_str(input).map_err(|e| AstError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, AstError> {
        serde_json::to_string(self).map_err(|e| AstError::Json(e.to_string()))
    }

    /// Reject documents produced by a Pandoc whose AST this crate cannot represent.
    pub fn check_api_version(&self) -> Result<(), AstError> {
        match self.api_version.as_slice() {
            [1, minor, ..] if *minor >= MIN_API_MINOR => Ok(()),
            _ => Err(AstError::UnsupportedApiVersion(self.api_version.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    Json(String),
    UnsupportedApiVersion(Vec<u32>),
}

impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstError::Json(message) => write!(f, "Invalid Pandoc JSON: {}", message),
            AstError::UnsupportedApiVersion(version) => {
                let dotted: Vec<String> = version.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "Unsupported pandoc-api-version {} (need 1.{} or newer)",
                    dotted.join("."),
                    MIN_API_MINOR
                )
            }
        }
    }
}

impl std::error::Error for AstError {}

// =============================================================================
// Attributes
// =============================================================================

type AttrTuple = (String, Vec<String>, Vec<(String, String)>);

/// Identifier, classes and key/value pairs attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttrTuple", into = "AttrTuple")]
pub struct Attr {
    pub identifier: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    pub fn with_id(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove every pair with this key, returning the first value removed.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed = self.get(key).map(str::to_string);
        self.attributes.retain(|(k, _)| k != key);
        removed
    }
}

impl From<AttrTuple> for Attr {
    fn from((identifier, classes, attributes): AttrTuple) -> Self {
        Self {
            identifier,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrTuple {
    fn from(attr: Attr) -> Self {
        (attr.identifier, attr.classes, attr.attributes)
    }
}

/// Raw output format of a `RawBlock`/`RawInline`, e.g. `tex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format(pub String);

impl Format {
    pub fn tex() -> Self {
        Format("tex".to_string())
    }
}

// =============================================================================
// Blocks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(Format, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(usize, Attr, Vec<Inline>),
    HorizontalRule,
    Table(
        Attr,
        Caption,
        Vec<ColSpec>,
        TableHead,
        Vec<TableBody>,
        TableFoot,
    ),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

impl Block {
    pub fn header(level: usize, attr: Attr, content: Vec<Inline>) -> Self {
        Block::Header(level, attr, content)
    }

    /// Identifier of nodes that carry an `Attr`.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Block::CodeBlock(attr, _)
            | Block::Header(_, attr, _)
            | Block::Table(attr, ..)
            | Block::Figure(attr, ..)
            | Block::Div(attr, _) => Some(attr.identifier.as_str()),
            _ => None,
        }
    }
}

type CaptionTuple = (Option<Vec<Inline>>, Vec<Block>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CaptionTuple", into = "CaptionTuple")]
pub struct Caption {
    pub short: Option<Vec<Inline>>,
    pub long: Vec<Block>,
}

impl Caption {
    pub fn new(long: Vec<Block>) -> Self {
        Self { short: None, long }
    }
}

impl From<CaptionTuple> for Caption {
    fn from((short, long): CaptionTuple) -> Self {
        Self { short, long }
    }
}

impl From<Caption> for CaptionTuple {
    fn from(caption: Caption) -> Self {
        (caption.short, caption.long)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAttributes(pub i64, pub ListNumberStyle, pub ListNumberDelim);

impl Default for ListAttributes {
    fn default() -> Self {
        ListAttributes(1, ListNumberStyle::DefaultStyle, ListNumberDelim::DefaultDelim)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColSpec(pub Alignment, pub ColWidth);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    AlignDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableHead(pub Attr, pub Vec<Row>);

/// Attributes, row-head column count, intermediate head rows, body rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBody(pub Attr, pub i64, pub Vec<Row>, pub Vec<Row>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFoot(pub Attr, pub Vec<Row>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(pub Attr, pub Vec<Cell>);

/// Attributes, alignment, row span, column span, content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell(pub Attr, pub Alignment, pub i64, pub i64, pub Vec<Block>);

impl Cell {
    pub fn new(content: Vec<Block>) -> Self {
        Cell(Attr::default(), Alignment::AlignDefault, 1, 1, content)
    }
}

// =============================================================================
// Inlines
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    Str(String),
    Emph(Vec<Inline>),
    Underline(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Superscript(Vec<Inline>),
    Subscript(Vec<Inline>),
    SmallCaps(Vec<Inline>),
    Quoted(QuoteType, Vec<Inline>),
    Cite(Vec<Citation>, Vec<Inline>),
    Code(Attr, String),
    Space,
    SoftBreak,
    LineBreak,
    Math(MathType, String),
    RawInline(Format, String),
    Link(Attr, Vec<Inline>, Target),
    Image(Attr, Vec<Inline>, Target),
    Note(Vec<Block>),
    Span(Attr, Vec<Inline>),
}

impl Inline {
    pub fn str(s: impl Into<String>) -> Self {
        Inline::Str(s.into())
    }

    pub fn raw_tex(s: impl Into<String>) -> Self {
        Inline::RawInline(Format::tex(), s.into())
    }

    pub fn display_math(s: impl Into<String>) -> Self {
        Inline::Math(MathType::DisplayMath, s.into())
    }
}

type TargetTuple = (String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TargetTuple", into = "TargetTuple")]
pub struct Target {
    pub url: String,
    pub title: String,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

impl From<TargetTuple> for Target {
    fn from((url, title): TargetTuple) -> Self {
        Self { url, title }
    }
}

impl From<Target> for TargetTuple {
    fn from(target: Target) -> Self {
        (target.url, target.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MathType {
    DisplayMath,
    InlineMath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum QuoteType {
    SingleQuote,
    DoubleQuote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub citation_id: String,
    pub citation_prefix: Vec<Inline>,
    pub citation_suffix: Vec<Inline>,
    pub citation_mode: CitationMode,
    pub citation_note_num: i64,
    pub citation_hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum CitationMode {
    AuthorInText,
    SuppressAuthor,
    NormalCitation,
}

// =============================================================================
// Metadata
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum MetaValue {
    MetaMap(IndexMap<String, MetaValue>),
    MetaList(Vec<MetaValue>),
    MetaBool(bool),
    MetaString(String),
    MetaInlines(Vec<Inline>),
    MetaBlocks(Vec<Block>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_header_wire_shape() {
        let block = Block::header(
            2,
            Attr::with_id("intro").class("unnumbered"),
            vec![Inline::str("Intro"), Inline::Space],
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "t": "Header",
                "c": [2, ["intro", ["unnumbered"], []], [
                    {"t": "Str", "c": "Intro"},
                    {"t": "Space"}
                ]]
            })
        );
    }

    #[test]
    fn test_parse_image_and_math() {
        let input = r#"{"t":"Para","c":[
            {"t":"Image","c":[["",[],[["width","50%"]]],[],["fig.png",""]]},
            {"t":"Math","c":[{"t":"DisplayMath"},"x^2"]}
        ]}"#;
        let block: Block = serde_json::from_str(input).unwrap();
        let Block::Para(inlines) = block else {
            panic!("expected Para");
        };
        match &inlines[0] {
            Inline::Image(attr, _, target) => {
                assert_eq!(attr.get("width"), Some("50%"));
                assert_eq!(target.url, "fig.png");
            }
            other => panic!("expected Image, got {:?}", other),
        }
        assert_eq!(inlines[1], Inline::display_math("x^2"));
    }

    #[test]
    fn test_document_with_table_parses() {
        let input = r#"{"pandoc-api-version":[1,23,1],"meta":{
            "abstract":{"t":"MetaBlocks","c":[{"t":"Para","c":[{"t":"Str","c":"Short"}]}]}
        },"blocks":[
            {"t":"Table","c":[["tab:a",[],[]],[null,[{"t":"Plain","c":[{"t":"Str","c":"Data"}]}]],
                [[{"t":"AlignDefault"},{"t":"ColWidthDefault"}]],
                [["",[],[]],[]],
                [[["",[],[]],0,[],[[["",[],[]],[[["",[],[]],{"t":"AlignDefault"},1,1,[]]]]]]],
                [["",[],[]],[]]]}
        ]}"#;
        let doc = Pandoc::from_json(input).unwrap();
        assert!(doc.check_api_version().is_ok());
        assert!(matches!(doc.meta.get("abstract"), Some(MetaValue::MetaBlocks(_))));
        assert_eq!(doc.blocks[0].identifier(), Some("tab:a"));
    }

    #[test]
    fn test_old_api_version_rejected() {
        let mut doc = Pandoc::new(Vec::new());
        doc.api_version = vec![1, 22];
        let err = doc.check_api_version().unwrap_err();
        assert!(err.to_string().contains("1.22"));
    }

    #[test]
    fn test_attr_remove_drops_all_pairs() {
        let mut attr = Attr::default()
            .attribute("width", "3in")
            .attribute("height", "1in")
            .attribute("width", "2in");
        assert_eq!(attr.remove("width"), Some("3in".to_string()));
        assert_eq!(attr.attributes, vec![("height".to_string(), "1in".to_string())]);
        assert_eq!(attr.remove("width"), None);
    }
}
