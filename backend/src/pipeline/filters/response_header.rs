use async_trait::async_trait;
use tracing::info;

use crate::pipeline::{ActionContext, ActionFilter, ActionOutcome, Next};

/// Adds a fixed response header before the rest of the chain runs.
#[derive(Debug, Clone)]
pub struct ResponseHeaderFilter {
    key: String,
    value: String,
    order: i32,
}

impl ResponseHeaderFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>, order: i32) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            order,
        }
    }
}

#[async_trait]
impl ActionFilter for ResponseHeaderFilter {
    fn name(&self) -> &'static str {
        "ResponseHeaderFilter"
    }

    fn order(&self) -> i32 {
        self.order
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        info!(filter = self.name(), key = %self.key, "on_action - before");
        ctx.set_response_header(&self.key, &self.value);

        let outcome = next.run(ctx).await;

        info!(filter = self.name(), key = %self.key, "on_action - after");
        outcome
    }
}
