//! Request pipeline: an ordered chain of filters around each action.
//!
//! Every routed action runs as `filters -> handler` over one
//! [`ActionContext`]. Filters can read and rewrite the argument bag, stash
//! values for later filters, add response headers, short-circuit with their
//! own [`ActionResult`], or translate errors raised further in.

mod chain;
mod context;
mod error;
mod result;

pub mod filters;

pub use chain::{
    ActionFilter, ActionHandler, ActionOutcome, Next, Pipeline, AUTHORIZATION_FILTER_ORDER,
    EXCEPTION_FILTER_ORDER, RESOURCE_FILTER_ORDER, RESULT_FILTER_ORDER,
};
pub use context::{ActionContext, ArgumentBag, ARGUMENTS_ITEM_KEY};
pub use error::ActionError;
pub use result::ActionResult;
