//! Action messages exchanged with the diagram client.
//!
//! Incoming actions are kept as raw JSON so the handler registry can route
//! them by `kind` and each handler parses its own payload. Outgoing actions
//! are typed.

use serde::{Deserialize, Serialize};

use super::{FilterSpec, GraphModel, RenderOptions};

/// Envelope around every action sent over the socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMessage<A = serde_json::Value> {
    /// Diagram client the action belongs to.
    #[serde(default)]
    pub client_id: Option<String>,

    /// The action itself.
    pub action: A,
}

impl ActionMessage {
    /// The `kind` discriminator of the wrapped action.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.action.get("kind").and_then(|v| v.as_str())
    }
}

/// Action kinds understood by the server.
pub mod kinds {
    pub const REQUEST_MODEL: &str = "requestModel";
    pub const FILTER: &str = "filterAction";
    pub const SET_MODEL: &str = "setModel";
    pub const UPDATE_MODEL: &str = "updateModel";
    pub const FIT_TO_SCREEN: &str = "fit";
}

/// Client asks for the initial model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestModelAction {
    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

/// Client submits a filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAction {
    /// Filter to apply; absent means the unfiltered graph.
    #[serde(default)]
    pub filter: Option<FilterSpec>,

    #[serde(default)]
    pub render_options: RenderOptions,
}

/// Actions the server sends to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ServerAction {
    /// Replace the client model (answer to `requestModel`).
    #[serde(rename = "setModel", rename_all = "camelCase")]
    SetModel {
        new_root: Box<GraphModel>,
        response_id: String,
    },

    /// Update the client model after a filter change.
    #[serde(rename = "updateModel", rename_all = "camelCase")]
    UpdateModel {
        new_root: Box<GraphModel>,
        animate: bool,
    },

    /// Fit the viewport to the given elements.
    #[serde(rename = "fit", rename_all = "camelCase")]
    FitToScreen {
        element_ids: Vec<String>,
        max_zoom: f64,
        padding: f64,
        animate: bool,
    },
}

impl ServerAction {
    /// The `kind` this action serializes with.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetModel { .. } => kinds::SET_MODEL,
            Self::UpdateModel { .. } => kinds::UPDATE_MODEL,
            Self::FitToScreen { .. } => kinds::FIT_TO_SCREEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind() {
        let json = r#"{"clientId": "sprotty", "action": {"kind": "requestModel", "requestId": "r1"}}"#;
        let msg: ActionMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind(), Some("requestModel"));
        assert_eq!(msg.client_id.as_deref(), Some("sprotty"));
    }

    #[test]
    fn test_fit_action_wire_shape() {
        let action = ServerAction::FitToScreen {
            element_ids: vec!["a".into()],
            max_zoom: 0.5,
            padding: 100.0,
            animate: true,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["kind"], "fit");
        assert_eq!(value["elementIds"][0], "a");
        assert_eq!(value["maxZoom"], 0.5);
    }

    #[test]
    fn test_filter_action_without_filter() {
        let action: FilterAction = serde_json::from_str(r#"{"kind": "filterAction"}"#).unwrap();
        assert!(action.filter.is_none());
        assert!(!action.render_options.use_zoom_factor);
    }
}
