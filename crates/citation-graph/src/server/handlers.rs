//! Action handlers for the diagram client.
//!
//! Each handler owns one action `kind`, parses its own payload and answers
//! with zero or more server actions.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::engine::GraphGenerator;
use crate::error::{ServerError, ServerResult};
use crate::models::{
    ActionMessage, FilterAction, RenderOptions, RequestModelAction, ServerAction, action_kinds,
};

/// Handler execution context.
pub struct ActionContext {
    /// Shared graph generator.
    pub generator: Arc<GraphGenerator>,

    /// Maximum zoom for the fit sent after filtering.
    pub fit_max_zoom: f64,

    /// Padding for the fit sent after filtering.
    pub fit_padding: f64,
}

impl ActionContext {
    /// Create a new action context.
    #[must_use]
    pub fn new(generator: Arc<GraphGenerator>, config: &Config) -> Self {
        Self { generator, fit_max_zoom: config.fit_max_zoom, fit_padding: config.fit_padding }
    }
}

/// Trait for action handlers.
#[async_trait::async_trait]
pub trait ActionHandler: Send + Sync {
    /// Action kind handled (e.g., "requestModel").
    fn kind(&self) -> &'static str;

    /// Handle one action and return the actions to send back.
    async fn handle(&self, ctx: &ActionContext, action: Value) -> ServerResult<Vec<ServerAction>>;
}

/// Answers `requestModel` with the unfiltered graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestModelHandler;

#[async_trait::async_trait]
impl ActionHandler for RequestModelHandler {
    fn kind(&self) -> &'static str {
        action_kinds::REQUEST_MODEL
    }

    async fn handle(&self, ctx: &ActionContext, action: Value) -> ServerResult<Vec<ServerAction>> {
        let request: RequestModelAction = serde_json::from_value(action)?;
        let graph = ctx.generator.generate(None, RenderOptions::default()).await;

        Ok(vec![ServerAction::SetModel {
            new_root: Box::new((*graph).clone()),
            response_id: request.request_id,
        }])
    }
}

/// Answers `filterAction` with the filtered graph and a fit to its papers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterHandler;

#[async_trait::async_trait]
impl ActionHandler for FilterHandler {
    fn kind(&self) -> &'static str {
        action_kinds::FILTER
    }

    async fn handle(&self, ctx: &ActionContext, action: Value) -> ServerResult<Vec<ServerAction>> {
        let request: FilterAction = serde_json::from_value(action)?;
        let graph = ctx.generator.generate(request.filter, request.render_options).await;

        let element_ids = graph.paper_ids();
        tracing::debug!(papers = element_ids.len(), "Filtered graph");

        Ok(vec![
            ServerAction::UpdateModel { new_root: Box::new((*graph).clone()), animate: true },
            ServerAction::FitToScreen {
                element_ids,
                max_zoom: ctx.fit_max_zoom,
                padding: ctx.fit_padding,
                animate: true,
            },
        ])
    }
}

/// Register all handlers.
#[must_use]
pub fn register_all_handlers() -> Vec<Box<dyn ActionHandler>> {
    vec![Box::new(RequestModelHandler), Box::new(FilterHandler)]
}

/// Routes incoming action messages to their handler.
pub struct ActionDispatcher {
    ctx: ActionContext,
    handlers: Vec<Box<dyn ActionHandler>>,
}

impl ActionDispatcher {
    /// Create a dispatcher with all handlers registered.
    #[must_use]
    pub fn new(ctx: ActionContext) -> Self {
        Self { ctx, handlers: register_all_handlers() }
    }

    /// Get handler by kind.
    #[must_use]
    pub fn get_handler(&self, kind: &str) -> Option<&dyn ActionHandler> {
        self.handlers.iter().find(|h| h.kind() == kind).map(|h| h.as_ref())
    }

    /// List the action kinds handled.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.kind()).collect()
    }

    /// Shared generator.
    #[must_use]
    pub fn generator(&self) -> &Arc<GraphGenerator> {
        &self.ctx.generator
    }

    /// Handle one message; replies carry the sender's client ID.
    ///
    /// Messages of unknown kind produce no reply.
    ///
    /// # Errors
    ///
    /// Returns error if the message has no kind or its payload does not parse.
    pub async fn dispatch(
        &self,
        message: ActionMessage,
    ) -> ServerResult<Vec<ActionMessage<ServerAction>>> {
        let kind = message.kind().ok_or(ServerError::MissingKind)?;

        let Some(handler) = self.get_handler(kind) else {
            tracing::warn!(kind, "Ignoring action of unknown kind");
            return Ok(Vec::new());
        };

        tracing::debug!(kind, client_id = ?message.client_id, "Handling action");

        let ActionMessage { client_id, action } = message;
        let replies = handler.handle(&self.ctx, action).await?;

        Ok(replies
            .into_iter()
            .map(|action| ActionMessage { client_id: client_id.clone(), action })
            .collect())
    }

    /// Handle one raw text message and serialize the replies.
    ///
    /// Replies echo the `clientId` of this message only; a message without
    /// one is answered without one. Failures are reported as a single error
    /// payload instead of replies.
    pub async fn dispatch_text(&self, text: &str) -> Vec<String> {
        let result = match serde_json::from_str::<ActionMessage>(text) {
            Ok(message) => self.dispatch(message).await,
            Err(e) => Err(ServerError::from(e)),
        };

        let replies = match result {
            Ok(replies) => replies.iter().map(serde_json::to_string).collect::<Result<Vec<_>, _>>(),
            Err(e) => {
                tracing::warn!(error = %e, "Action failed");
                return vec![e.to_client_message().to_string()];
            }
        };

        match replies {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize replies");
                vec![ServerError::from(e).to_client_message().to_string()]
            }
        }
    }
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher").field("kinds", &self.kinds()).finish()
    }
}
