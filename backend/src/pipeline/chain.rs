//! Ordered filter chain around an action handler.
//!
//! Filters are sorted once, at registration, by their declared order. A pass
//! enters them in ascending order and unwinds in descending order: each
//! filter receives a [`Next`] continuation and decides whether, and when, to
//! call it. Returning without calling `next` short-circuits every inner
//! filter and the handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use super::context::ActionContext;
use super::error::ActionError;
use super::result::ActionResult;

pub type ActionOutcome = Result<ActionResult, ActionError>;

/// Order reserved for exception translation; runs outside every other filter.
pub const EXCEPTION_FILTER_ORDER: i32 = i32::MIN;
/// Order for authorization gates.
pub const AUTHORIZATION_FILTER_ORDER: i32 = i32::MIN + 1;
/// Order for resource gates.
pub const RESOURCE_FILTER_ORDER: i32 = i32::MIN + 2;
/// Order for result filters; runs innermost, directly around the handler.
pub const RESULT_FILTER_ORDER: i32 = i32::MAX;

/// The routed action at the center of the chain.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome;
}

/// A cross-cutting step wrapped around a handler.
#[async_trait]
pub trait ActionFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower orders run first on the way in and last on the way out.
    fn order(&self) -> i32;

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome;
}

/// The rest of the chain after the current filter.
pub struct Next<'a> {
    filters: &'a [Arc<dyn ActionFilter>],
    handler: &'a dyn ActionHandler,
}

impl<'a> Next<'a> {
    /// Run the remaining filters and then the handler.
    pub async fn run(self, ctx: &mut ActionContext) -> ActionOutcome {
        match self.filters.split_first() {
            Some((filter, rest)) => {
                trace!(filter = filter.name(), action = ctx.action, "Entering filter");
                let next = Next {
                    filters: rest,
                    handler: self.handler,
                };
                filter.on_action(ctx, next).await
            }
            None => self.handler.handle(ctx).await,
        }
    }
}

/// Filters registered for one action, kept sorted by order.
#[derive(Clone, Default)]
pub struct Pipeline {
    filters: Vec<Arc<dyn ActionFilter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter. Filters with equal order keep registration order.
    pub fn with<F: ActionFilter + 'static>(self, filter: F) -> Self {
        self.with_shared(Arc::new(filter))
    }

    /// Register a filter instance shared with other pipelines.
    pub fn with_shared(mut self, filter: Arc<dyn ActionFilter>) -> Self {
        self.filters.push(filter);
        self.filters.sort_by_key(|f| f.order());
        self
    }

    /// Filter names in execution order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub async fn execute(&self, handler: &dyn ActionHandler, ctx: &mut ActionContext) -> ActionOutcome {
        Next {
            filters: &self.filters,
            handler,
        }
        .run(ctx)
        .await
    }
}
