use async_trait::async_trait;
use http::StatusCode;
use tracing::info;

use crate::pipeline::{
    ActionContext, ActionFilter, ActionOutcome, ActionResult, Next, RESOURCE_FILTER_ORDER,
};

/// Answers `404 Not Found` without running the action while the feature is
/// switched off.
#[derive(Debug, Clone)]
pub struct FeatureDisabledFilter {
    is_disabled: bool,
}

impl FeatureDisabledFilter {
    pub fn new(is_disabled: bool) -> Self {
        Self { is_disabled }
    }
}

#[async_trait]
impl ActionFilter for FeatureDisabledFilter {
    fn name(&self) -> &'static str {
        "FeatureDisabledFilter"
    }

    fn order(&self) -> i32 {
        RESOURCE_FILTER_ORDER
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        if self.is_disabled {
            info!(filter = self.name(), action = ctx.action, "Feature disabled");
            return Ok(ActionResult::Status(StatusCode::NOT_FOUND));
        }
        next.run(ctx).await
    }
}
