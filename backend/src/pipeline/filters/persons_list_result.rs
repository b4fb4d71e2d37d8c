use async_trait::async_trait;
use chrono::Utc;
use http::header::LAST_MODIFIED;
use tracing::info;

use crate::pipeline::{ActionContext, ActionFilter, ActionOutcome, Next, RESULT_FILTER_ORDER};

/// HTTP-date layout for `Last-Modified`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Stamps a successful list response with `Last-Modified: <now>`.
#[derive(Debug, Clone, Default)]
pub struct PersonsListResultFilter;

#[async_trait]
impl ActionFilter for PersonsListResultFilter {
    fn name(&self) -> &'static str {
        "PersonsListResultFilter"
    }

    fn order(&self) -> i32 {
        RESULT_FILTER_ORDER
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        info!(filter = self.name(), "on_result_executing");
        let result = next.run(ctx).await?;

        let stamp = Utc::now().format(HTTP_DATE_FORMAT).to_string();
        ctx.set_response_header(LAST_MODIFIED.as_str(), &stamp);
        info!(filter = self.name(), "on_result_executed");
        Ok(result)
    }
}
