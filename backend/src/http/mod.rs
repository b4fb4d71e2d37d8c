//! HTTP server module for the people registry.
//!
//! axum routes each request to a handler that builds the action's argument
//! bag and runs its filter pipeline. The layers below are the same ones the
//! library exposes directly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Argument extraction into the ArgumentBag               │
//! │  - Pipeline execution, ActionResult -> Response           │
//! │  - CORS, compression, tracing                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Pipeline (pipeline/)                                     │
//! │  - Ordered filters around an action handler               │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Validation, search, sort, exports                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod pipelines;
pub mod response;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
