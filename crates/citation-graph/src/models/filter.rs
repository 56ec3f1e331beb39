//! Filter request sent by the client's filter panel.

use serde::{Deserialize, Serialize};

/// Sentinel matching papers without any recorded field of study.
pub const UNKNOWN_FIELD: &str = "unknown";

/// Inclusive publication year range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First year (inclusive).
    #[serde(default)]
    pub from: i32,

    /// Last year (inclusive). Zero means no range is configured.
    #[serde(default)]
    pub to: i32,
}

impl YearRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    /// A range with `to == 0` is treated as unset.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.to != 0
    }

    /// Check whether a year falls inside the range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.from && year <= self.to
    }
}

/// Which papers should be visible and how far the neighborhood expands.
///
/// Every field is optional on the wire; a missing field never constrains the
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Discard the filter and show the whole dataset.
    #[serde(default)]
    pub reset: bool,

    /// Keep every paper and only mark the matching ones as highlighted.
    #[serde(default)]
    pub highlight_only: bool,

    /// Explicit allow-list of paper IDs (empty = no restriction).
    #[serde(default)]
    pub paper_ids: Vec<String>,

    /// Case-insensitive title substring.
    #[serde(default)]
    pub title_filter: String,

    /// Case-insensitive author name substring.
    #[serde(default)]
    pub author_filter: String,

    /// Publication year range.
    #[serde(default)]
    pub year_filter: Option<YearRange>,

    /// Fields of study; `"unknown"` matches papers without fields.
    #[serde(default)]
    pub fields_of_study_filter: Vec<String>,

    /// Required open access flag.
    #[serde(default)]
    pub is_open_access: Option<bool>,

    /// In highlight-only mode, drop wires touching non-highlighted papers.
    #[serde(default)]
    pub hide_wires_of_hidden_nodes: bool,

    /// Drop all wires while keeping the nodes.
    #[serde(default)]
    pub hide_wires: bool,

    /// Hops to follow along citations.
    #[serde(default)]
    pub additional_child_levels: u32,

    /// Hops to follow along inverse citations.
    #[serde(default)]
    pub additional_parent_levels: u32,
}

impl FilterSpec {
    /// Whether neighborhood expansion runs for this request.
    #[must_use]
    pub const fn expands(&self) -> bool {
        self.additional_child_levels > 0 || self.additional_parent_levels > 0
    }

    /// Builder-style helper: restrict to the given IDs.
    #[must_use]
    pub fn with_paper_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paper_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper: set both expansion budgets.
    #[must_use]
    pub const fn with_levels(mut self, child: u32, parent: u32) -> Self {
        self.additional_child_levels = child;
        self.additional_parent_levels = parent;
        self
    }
}
