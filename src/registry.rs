//! Label tables and counters filled by the numbering passes.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered mapping from a label to the number assigned to it.
///
/// The first registration of a key wins; numbers are never reassigned.
#[derive(Debug, Clone)]
pub struct LabelTable<K: Hash + Eq = String> {
    entries: IndexMap<K, String>,
}

impl<K: Hash + Eq> Default for LabelTable<K> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> LabelTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `number` under `key`. Returns `false` if the key was taken.
    pub fn register(&mut self, key: K, number: impl Into<String>) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(number.into());
                true
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// Theorem registry key: the author's label, or the theorem's position
/// when it has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TheoremKey {
    Label(String),
    Position(usize),
}

impl fmt::Display for TheoremKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TheoremKey::Label(label) => write!(f, "{}", label),
            TheoremKey::Position(n) => write!(f, "#{}", n),
        }
    }
}

/// Which table a label was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Header,
    Figure,
    Table,
    Theorem,
    Equation,
}

impl LabelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Header => "header",
            LabelKind::Figure => "figure",
            LabelKind::Table => "table",
            LabelKind::Theorem => "theorem",
            LabelKind::Equation => "equation",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registries {
    pub headers: LabelTable,
    pub figures: LabelTable,
    pub tables: LabelTable,
    pub theorems: LabelTable<TheoremKey>,
    pub equations: LabelTable,
}

impl Registries {
    /// Look a `\ref` target up in headers, figures, tables, then theorems.
    pub fn resolve(&self, name: &str) -> Option<(LabelKind, &str)> {
        self.headers
            .get(name)
            .map(|n| (LabelKind::Header, n))
            .or_else(|| self.figures.get(name).map(|n| (LabelKind::Figure, n)))
            .or_else(|| self.tables.get(name).map(|n| (LabelKind::Table, n)))
            .or_else(|| {
                self.theorems
                    .get(&TheoremKey::Label(name.to_string()))
                    .map(|n| (LabelKind::Theorem, n))
            })
    }

    pub fn resolve_equation(&self, name: &str) -> Option<&str> {
        self.equations.get(name)
    }
}

/// Deepest heading level Pandoc produces; deeper levels count here.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Per-level heading counters; index is nesting depth minus one.
#[derive(Debug, Clone, Default)]
pub struct HeaderCounter {
    stack: Vec<usize>,
}

impl HeaderCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Count a heading at `level` and return its dotted number.
    pub fn advance(&mut self, level: usize) -> String {
        let level = level.clamp(1, MAX_HEADING_LEVEL);
        let depth = self.stack.len();
        if level > depth {
            self.stack.resize(level, 1);
        } else {
            self.stack.truncate(level);
            if let Some(last) = self.stack.last_mut() {
                *last += 1;
            }
        }
        let parts: Vec<String> = self.stack.iter().map(|n| n.to_string()).collect();
        parts.join(".")
    }
}

/// Equation counts per top-level section.
#[derive(Debug, Clone, Default)]
pub struct EquationCounter {
    sections: Vec<usize>,
    /// Equations labelled before the first top-level heading
    front_matter: usize,
}

impl EquationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting for a new top-level section.
    pub fn open_section(&mut self) {
        self.sections.push(0);
    }

    pub fn sections(&self) -> usize {
        self.sections.len()
    }

    /// Count one labelled equation and return its `(section.n)` number.
    pub fn next(&mut self) -> String {
        let section = self.sections.len();
        match self.sections.last_mut() {
            Some(count) => {
                *count += 1;
                format!("({}.{})", section, count)
            }
            None => {
                self.front_matter += 1;
                format!("(0.{})", self.front_matter)
            }
        }
    }
}
