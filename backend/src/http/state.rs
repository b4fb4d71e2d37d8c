//! Application state for the HTTP server.

use std::sync::Arc;

use super::pipelines::Pipelines;
use crate::config::FilterSettings;
use crate::db::RepositorySet;
use crate::services::{CountriesService, PdfRenderer, PersonsService};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store handles, kept for the health check
    pub repositories: RepositorySet,
    pub persons: PersonsService,
    pub countries: CountriesService,
    /// Renderer behind the PDF export
    pub pdf: Arc<dyn PdfRenderer>,
    /// Filter chains, built once at startup
    pub pipelines: Arc<Pipelines>,
}

impl AppState {
    /// Wire services and pipelines over the given repositories.
    pub fn new(
        repositories: RepositorySet,
        pdf: Arc<dyn PdfRenderer>,
        filters: &FilterSettings,
    ) -> Self {
        let persons = PersonsService::new(repositories.persons.clone());
        let countries = CountriesService::new(repositories.countries.clone());
        let pipelines = Arc::new(Pipelines::new(filters, &countries));
        Self {
            repositories,
            persons,
            countries,
            pdf,
            pipelines,
        }
    }
}
