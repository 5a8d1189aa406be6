//! Machine-readable summary of a filter run.

use serde::Serialize;

use crate::config::OutputFormat;
use crate::registry::{LabelKind, Registries};
use crate::utils::error::FilterWarning;

/// One registered label and the number it resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRecord {
    pub kind: LabelKind,
    pub label: String,
    pub number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub target: OutputFormat,
    pub labels: Vec<LabelRecord>,
    pub warnings: Vec<FilterWarning>,
}

impl FilterReport {
    pub fn new(
        target: OutputFormat,
        registries: &Registries,
        warnings: Vec<FilterWarning>,
    ) -> Self {
        let mut labels = Vec::new();
        let mut collect = |kind: LabelKind, entries: Vec<(String, &str)>| {
            labels.extend(entries.into_iter().map(|(label, number)| LabelRecord {
                kind,
                label,
                number: number.to_string(),
            }));
        };

        collect(LabelKind::Header, plain(registries.headers.iter()));
        collect(LabelKind::Figure, plain(registries.figures.iter()));
        collect(LabelKind::Table, plain(registries.tables.iter()));
        collect(
            LabelKind::Theorem,
            registries
                .theorems
                .iter()
                .map(|(key, number)| (key.to_string(), number))
                .collect(),
        );
        collect(LabelKind::Equation, plain(registries.equations.iter()));

        Self {
            target,
            labels,
            warnings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.warnings.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn plain<'a>(entries: impl Iterator<Item = (&'a String, &'a str)>) -> Vec<(String, &'a str)> {
    entries.map(|(label, number)| (label.clone(), number)).collect()
}
