//! Diagram model elements pushed to the client.
//!
//! The element tree follows the JSON shape the diagram client expects:
//! every element carries a `type` tag and an `id`, containers carry
//! `children`.

use serde::{Deserialize, Serialize};

use super::PaperAuthor;

/// Element type of the graph root.
pub const GRAPH_TYPE: &str = "graph";

/// ID of the graph root.
pub const GRAPH_ID: &str = "graph";

/// Per-render switches read by the client views.
///
/// Sent with each filter request and echoed on the produced model, so the
/// view layer never depends on process-wide flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Skip rendering of elements outside the viewport.
    #[serde(default)]
    pub use_is_visible: bool,

    /// Hide labels below their minimum zoom level.
    #[serde(default)]
    pub use_zoom_factor: bool,
}

/// Layout hints for compartments and labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_align: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_gap: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
}

/// A node representing one paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperNode {
    pub id: String,
    pub paper_id: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub fields_of_study: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
    pub layout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<LayoutOptions>,
    #[serde(default)]
    pub children: Vec<GraphElement>,
}

/// A layout container inside a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: String,
    pub layout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<LayoutOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom_level: Option<f64>,
    #[serde(default)]
    pub children: Vec<GraphElement>,
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<LayoutOptions>,
}

/// A directed citation edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

impl Edge {
    /// Create an edge with the conventional `source-target` ID.
    #[must_use]
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}-{target}"),
            source_id: source.to_string(),
            target_id: target.to_string(),
        }
    }
}

/// Any element of the diagram tree, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GraphElement {
    #[serde(rename = "node:paper")]
    Paper(PaperNode),
    #[serde(rename = "compartment")]
    Compartment(Compartment),
    #[serde(rename = "compartment:badge")]
    Badge(Compartment),
    #[serde(rename = "label")]
    Label(Label),
    #[serde(rename = "edge")]
    Edge(Edge),
}

impl GraphElement {
    /// Element ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Paper(n) => &n.id,
            Self::Compartment(c) | Self::Badge(c) => &c.id,
            Self::Label(l) => &l.id,
            Self::Edge(e) => &e.id,
        }
    }

    /// Element type tag as sent on the wire.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Paper(_) => "node:paper",
            Self::Compartment(_) => "compartment",
            Self::Badge(_) => "compartment:badge",
            Self::Label(_) => "label",
            Self::Edge(_) => "edge",
        }
    }
}

/// Root of the diagram model plus the metadata the filter panel needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    /// Paper nodes first, then edges.
    pub children: Vec<GraphElement>,
    /// ID of the paper the dataset was grown from.
    pub root_id: String,
    /// Unique authors across the dataset.
    pub authors: Vec<PaperAuthor>,
    /// Unique fields of study across the dataset.
    pub fields_of_study: Vec<String>,
    /// Sorted unique publication years.
    pub years: Vec<i32>,
    #[serde(default)]
    pub render_options: RenderOptions,
}

impl GraphModel {
    /// Iterate over the paper nodes.
    pub fn paper_nodes(&self) -> impl Iterator<Item = &PaperNode> {
        self.children.iter().filter_map(|child| match child {
            GraphElement::Paper(node) => Some(node),
            _ => None,
        })
    }

    /// Iterate over the edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.children.iter().filter_map(|child| match child {
            GraphElement::Edge(edge) => Some(edge),
            _ => None,
        })
    }

    /// IDs of all paper nodes, in model order.
    #[must_use]
    pub fn paper_ids(&self) -> Vec<String> {
        self.paper_nodes().map(|n| n.id.clone()).collect()
    }
}
