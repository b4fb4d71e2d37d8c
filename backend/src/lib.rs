//! # People Registry
//!
//! Person and country records behind a filter-pipeline web front end.
//!
//! Every routed action runs through an ordered chain of filters that share a
//! request-scoped argument bag. Filters rewrite arguments, decorate views,
//! gate access, and translate failures, while the action handler at the
//! center calls the services.
//!
//! ## Architecture
//!
//! - [`api`]: transfer objects for forms and views
//! - [`models`]: stored entities and identities
//! - [`db`]: repository traits, in-memory and Postgres stores, seeding
//! - [`services`]: validation, search and sort, exports, country import
//! - [`pipeline`]: the filter chain, argument bag and action results
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: axum routes that feed the pipelines

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
