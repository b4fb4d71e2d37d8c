use async_trait::async_trait;
use http::StatusCode;
use tracing::error;

use crate::pipeline::{
    ActionContext, ActionFilter, ActionOutcome, ActionResult, Next, EXCEPTION_FILTER_ORDER,
};

/// Turns any error from the inner chain into a `500` text response whose
/// body is the error message.
#[derive(Debug, Clone, Default)]
pub struct HandleExceptionFilter;

#[async_trait]
impl ActionFilter for HandleExceptionFilter {
    fn name(&self) -> &'static str {
        "HandleExceptionFilter"
    }

    fn order(&self) -> i32 {
        EXCEPTION_FILTER_ORDER
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        match next.run(ctx).await {
            Ok(result) => Ok(result),
            Err(err) => {
                error!(
                    filter = self.name(),
                    action = ctx.action,
                    kind = err.kind(),
                    message = %err,
                    "Unhandled action error"
                );
                Ok(ActionResult::Content {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: err.to_string(),
                })
            }
        }
    }
}
