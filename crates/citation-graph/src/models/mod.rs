//! Data models for the citation graph.
//!
//! All wire models use `#[serde(rename_all = "camelCase")]` to match the
//! dataset and the diagram client, and `#[serde(default)]` for optional fields.

mod actions;
mod filter;
mod graph;
mod paper;

pub use actions::{
    ActionMessage, FilterAction, RequestModelAction, ServerAction, kinds as action_kinds,
};
pub use filter::{FilterSpec, UNKNOWN_FIELD, YearRange};
pub use graph::{
    Compartment, Edge, GRAPH_ID, GRAPH_TYPE, GraphElement, GraphModel, Label, LayoutOptions,
    PaperNode, RenderOptions,
};
pub use paper::{Paper, PaperAuthor, PaperTree};
