#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Application fixtures
// =============================================================================

#[cfg(feature = "http-server")]
pub use app::*;

#[cfg(feature = "http-server")]
mod app {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, Response};
    use axum::Router;
    use http_body_util::BodyExt;
    use parking_lot::Mutex;
    use serde_json::Value;

    use people_registry::config::FilterSettings;
    use people_registry::db::{RepositoryFactory, RepositorySet};
    use people_registry::http::{create_router, AppState};
    use people_registry::models::{Country, CountryId};
    use people_registry::services::{PdfOptions, PdfRenderer, ServiceResult};

    /// Renderer that records the HTML it was given instead of running a
    /// converter.
    #[derive(Default)]
    pub struct StubPdfRenderer {
        pub last_html: Mutex<Option<String>>,
        pub last_options: Mutex<Option<PdfOptions>>,
    }

    #[async_trait]
    impl PdfRenderer for StubPdfRenderer {
        async fn render(&self, html: &str, options: &PdfOptions) -> ServiceResult<Vec<u8>> {
            *self.last_html.lock() = Some(html.to_string());
            *self.last_options.lock() = Some(options.clone());
            Ok(b"%PDF-1.4 stub".to_vec())
        }
    }

    /// A router over a fresh in-memory store.
    pub struct TestApp {
        pub router: Router,
        pub repositories: RepositorySet,
        pub pdf: Arc<StubPdfRenderer>,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_filters(FilterSettings::default())
        }

        pub fn with_filters(filters: FilterSettings) -> Self {
            let repositories = RepositoryFactory::create_local();
            let pdf = Arc::new(StubPdfRenderer::default());
            let state = AppState::new(repositories.clone(), pdf.clone(), &filters);
            Self {
                router: create_router(state),
                repositories,
                pdf,
            }
        }

        pub async fn add_country(&self, name: &str) -> Country {
            self.repositories
                .countries
                .add_country(Country::new(CountryId::generate(), name))
                .await
                .expect("country insert")
        }
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    /// Urlencoded form post, optionally carrying a `Cookie` header.
    pub fn post_form(uri: &str, pairs: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
        let body = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).expect("request")
    }

    /// Multipart post with one file part.
    pub fn post_file(uri: &str, field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "X-PEOPLE-REGISTRY-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    fn encode(raw: &str) -> String {
        raw.bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    (b as char).to_string()
                }
                b' ' => "+".to_string(),
                other => format!("%{:02X}", other),
            })
            .collect()
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        serde_json::from_slice(&body_bytes(response).await).expect("json body")
    }
}
