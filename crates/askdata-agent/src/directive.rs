//! Instructions embedded in a question, detected by pattern.
//!
//! Every pattern is matched against the lowercase question. Detection never fails; an absent or
//! malformed phrase simply produces no directive.

use regex::Regex;
use std::sync::OnceLock;

use crate::filter::NumberComparison;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `between <low> (to|and) <high>`, inclusive on both ends.
    Range { low: f64, high: f64 },
    /// `greater than|above <x>` or `less than|below|under <x>`.
    Compare(NumberComparison),
    /// `ascending`/`descending`, optionally narrowed by `based on|by <text>`.
    Sort {
        direction: SortDirection,
        by: Option<String>,
    },
    /// `top <n>`.
    Top { n: usize, direction: SortDirection },
}

/// All directives found in one question, in evaluation order: range, comparisons, sort, top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directives {
    items: Vec<Directive>,
}

impl Directives {
    pub fn detect(query: &str) -> Self {
        let mut items = Vec::new();
        items.extend(detect_range(query));
        items.extend(detect_greater_than(query));
        items.extend(detect_less_than(query));
        items.extend(detect_sort(query));
        items.extend(detect_top(query));
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn pattern(re: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(source).expect("valid directive regex"))
}

pub(crate) fn detect_range(query: &str) -> Option<Directive> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = pattern(&RE, r"between\s+(\d+\.?\d*)\s+(?:to|and)\s+(\d+\.?\d*)");
    let caps = re.captures(query)?;
    let low: f64 = caps.get(1)?.as_str().parse().ok()?;
    let high: f64 = caps.get(2)?.as_str().parse().ok()?;
    Some(Directive::Range { low, high })
}

pub(crate) fn detect_greater_than(query: &str) -> Option<Directive> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = pattern(&RE, r"(greater than|above)\s+(\d+\.?\d*)");
    let bound: f64 = re.captures(query)?.get(2)?.as_str().parse().ok()?;
    Some(Directive::Compare(NumberComparison::GreaterThan(bound)))
}

pub(crate) fn detect_less_than(query: &str) -> Option<Directive> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = pattern(&RE, r"(less than|below|under)\s+(\d+\.?\d*)");
    let bound: f64 = re.captures(query)?.get(2)?.as_str().parse().ok()?;
    Some(Directive::Compare(NumberComparison::LessThan(bound)))
}

const ASCENDING_KEYWORDS: [&str; 2] = ["ascending", "asc"];
const DESCENDING_KEYWORDS: [&str; 2] = ["descending", "desc"];

/// Sort direction from keywords. Descending is checked last and wins when both appear.
pub(crate) fn sort_direction(query: &str) -> Option<SortDirection> {
    let mut direction = None;
    if ASCENDING_KEYWORDS.iter().any(|k| query.contains(k)) {
        direction = Some(SortDirection::Ascending);
    }
    if DESCENDING_KEYWORDS.iter().any(|k| query.contains(k)) {
        direction = Some(SortDirection::Descending);
    }
    direction
}

pub(crate) fn detect_sort(query: &str) -> Option<Directive> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let direction = sort_direction(query)?;
    let re = pattern(&RE, r"(based on|by)\s+([\w\s]+)");
    let by = re
        .captures(query)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string());
    Some(Directive::Sort { direction, by })
}

const TOP_ASCENDING_KEYWORDS: [&str; 2] = ["lowest", "min"];

pub(crate) fn detect_top(query: &str) -> Option<Directive> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = pattern(&RE, r"top\s+(\d+)");
    let digits = re.captures(query)?.get(1)?.as_str();
    // The pattern only admits digits, so overflow is the only way parsing fails.
    let n = digits.parse::<usize>().unwrap_or(usize::MAX);
    let direction = if TOP_ASCENDING_KEYWORDS.iter().any(|k| query.contains(k)) {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    Some(Directive::Top { n, direction })
}
