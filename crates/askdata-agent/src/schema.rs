//! Lowercase column lookup built once per dataset.
//!
//! Column mentions are found by plain substring search: a column named `Score` is "mentioned" by
//! `scores`, `SCORE` or `underscore`. There is no tokenizer.

use askdata_model::Dataset;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct SchemaIndex {
    /// `(lowercase, canonical)` pairs in declaration order.
    entries: Vec<(String, String)>,
    numeric: HashSet<String>,
    numeric_order: Vec<String>,
}

impl SchemaIndex {
    pub fn new(dataset: &Dataset) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(dataset.column_count());
        for column in dataset.columns() {
            let key = column.name.to_lowercase();
            // A later column takes over the earlier one's name but keeps its position.
            if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                log::warn!(
                    "column `{}` shadows `{}` when resolving names from text",
                    column.name,
                    entry.1
                );
                entry.1 = column.name.clone();
                continue;
            }
            entries.push((key, column.name.clone()));
        }

        let numeric_order: Vec<String> = dataset
            .columns()
            .iter()
            .filter(|c| c.column_type.is_numeric())
            .map(|c| c.name.clone())
            .collect();
        let numeric = numeric_order.iter().cloned().collect();

        Self {
            entries,
            numeric,
            numeric_order,
        }
    }

    /// First column, in declaration order, whose lowercase name occurs in `text`.
    ///
    /// `text` is expected to be lowercase already.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| text.contains(key.as_str()))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Like [`SchemaIndex::resolve`], but only yields numeric columns.
    ///
    /// The first mentioned column wins even when it is not numeric; a later numeric mention is not
    /// considered.
    pub fn resolve_numeric(&self, text: &str) -> Option<&str> {
        self.resolve(text).filter(|col| self.is_numeric(col))
    }

    /// Every column mentioned in `text`, in declaration order.
    pub fn mentioned_columns(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for (key, canonical) in &self.entries {
            if text.contains(key.as_str()) && !out.contains(canonical) {
                out.push(canonical.clone());
            }
        }
        out
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.contains(column)
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_order
    }

    pub fn first_numeric(&self) -> Option<&str> {
        self.numeric_order.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
