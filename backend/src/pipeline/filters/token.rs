//! Cookie token pair: the result filter issues it, the authorization filter
//! checks it.

use async_trait::async_trait;
use http::header::SET_COOKIE;
use http::StatusCode;
use tracing::{info, warn};

use crate::pipeline::{
    ActionContext, ActionFilter, ActionOutcome, ActionResult, Next, AUTHORIZATION_FILTER_ORDER,
    RESULT_FILTER_ORDER,
};

/// Cookie carrying the placeholder token.
pub const AUTH_COOKIE: &str = "Auth-Key";

/// Sets the `Auth-Key` cookie on every response that passes through it.
#[derive(Debug, Clone)]
pub struct TokenResultFilter {
    token: String,
}

impl TokenResultFilter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl ActionFilter for TokenResultFilter {
    fn name(&self) -> &'static str {
        "TokenResultFilter"
    }

    fn order(&self) -> i32 {
        RESULT_FILTER_ORDER
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        let result = next.run(ctx).await?;
        ctx.append_response_header(
            SET_COOKIE,
            &format!("{}={}; Path=/; HttpOnly", AUTH_COOKIE, self.token),
        );
        info!(filter = self.name(), "Token cookie issued");
        Ok(result)
    }
}

/// Rejects the request with `401` unless its `Auth-Key` cookie equals the
/// configured token.
#[derive(Debug, Clone)]
pub struct TokenAuthorizationFilter {
    token: String,
}

impl TokenAuthorizationFilter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl ActionFilter for TokenAuthorizationFilter {
    fn name(&self) -> &'static str {
        "TokenAuthorizationFilter"
    }

    fn order(&self) -> i32 {
        AUTHORIZATION_FILTER_ORDER
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        match ctx.cookie(AUTH_COOKIE) {
            Some(token) if token == self.token => next.run(ctx).await,
            presented => {
                warn!(
                    filter = self.name(),
                    action = ctx.action,
                    cookie_present = presented.is_some(),
                    "Authorization token rejected"
                );
                Ok(ActionResult::Status(StatusCode::UNAUTHORIZED))
            }
        }
    }
}
