//! HTTP handlers for the routed actions.
//!
//! Each handler turns the request into an [`ArgumentBag`], then runs the
//! action's pipeline around the matching action handler.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::HeaderMap,
    response::Response,
    Form, Json,
};
use serde_json::Value;

use super::actions::{
    CountriesIndex, CountriesUpload, CountriesUploadForm, PersonsCreate, PersonsCreateForm,
    PersonsCsv, PersonsDelete, PersonsDeleteForm, PersonsEdit, PersonsEditForm, PersonsExcel,
    PersonsIndex, PersonsPdf, UploadedFile, EXCEL_FILE_ARGUMENT, PERSON_ID_ARGUMENT,
};
use super::dto::{HealthResponse, ListQuery};
use super::error::AppError;
use super::response::into_response;
use super::state::AppState;
use crate::api::{PersonField, SortOrder};
use crate::models::PersonId;
use crate::pipeline::filters::PERSON_REQUEST_ARGUMENT;
use crate::pipeline::{ActionContext, ActionHandler, ArgumentBag, Pipeline};

/// Result type for handlers.
pub type HandlerResult = Result<Response, AppError>;

/// Form field carrying the person identity.
const PERSON_ID_FIELD: &str = "person_id";

async fn run(
    pipeline: &Pipeline,
    handler: &dyn ActionHandler,
    mut ctx: ActionContext,
) -> HandlerResult {
    let result = pipeline.execute(handler, &mut ctx).await?;
    Ok(into_response(result, ctx.response_headers))
}

fn context(action: &'static str, arguments: ArgumentBag, headers: HeaderMap) -> ActionContext {
    ActionContext::new(action, arguments).with_request_headers(headers)
}

fn form_value(form: HashMap<String, String>) -> Value {
    Value::Object(form.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

fn person_id_bag(person_id: PersonId) -> ArgumentBag {
    let mut bag = ArgumentBag::new();
    bag.insert(PERSON_ID_ARGUMENT, person_id.to_string());
    bag
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.repositories.persons.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

// =============================================================================
// Persons
// =============================================================================

/// GET / and GET /persons/index
pub async fn persons_index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> HandlerResult {
    let mut bag = ArgumentBag::new();
    if let Some(search_by) = query.search_by {
        bag.insert("searchBy", search_by);
    }
    if let Some(search_string) = query.search_string {
        bag.insert("searchString", search_string);
    }
    bag.insert(
        "sortBy",
        query
            .sort_by
            .unwrap_or_else(|| PersonField::PersonName.key().to_string()),
    );
    bag.insert(
        "sortOrder",
        query
            .sort_order
            .unwrap_or_else(|| SortOrder::default().to_string()),
    );

    let handler = PersonsIndex {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_index,
        &handler,
        context("Persons.Index", bag, headers),
    )
    .await
}

/// GET /persons/create
pub async fn persons_create_form(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let handler = PersonsCreateForm {
        countries: state.countries.clone(),
    };
    run(
        &state.pipelines.persons_create_form,
        &handler,
        context("Persons.Create", ArgumentBag::new(), headers),
    )
    .await
}

/// POST /persons/create
pub async fn persons_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> HandlerResult {
    let mut bag = ArgumentBag::new();
    bag.insert(PERSON_REQUEST_ARGUMENT, form_value(form));

    let handler = PersonsCreate {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_create,
        &handler,
        context("Persons.Create", bag, headers),
    )
    .await
}

/// GET /persons/edit/{person_id}
pub async fn persons_edit_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<PersonId>,
) -> HandlerResult {
    let handler = PersonsEditForm {
        persons: state.persons.clone(),
        countries: state.countries.clone(),
    };
    run(
        &state.pipelines.persons_edit_form,
        &handler,
        context("Persons.Edit", person_id_bag(person_id), headers),
    )
    .await
}

/// POST /persons/edit/{person_id}
///
/// The route identity fills in `person_id` when the form leaves it blank.
pub async fn persons_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<PersonId>,
    Form(mut form): Form<HashMap<String, String>>,
) -> HandlerResult {
    let route_id = person_id.to_string();
    form.entry(PERSON_ID_FIELD.to_string())
        .and_modify(|value| {
            if value.trim().is_empty() {
                value.clone_from(&route_id);
            }
        })
        .or_insert_with(|| route_id.clone());

    let mut bag = person_id_bag(person_id);
    bag.insert(PERSON_REQUEST_ARGUMENT, form_value(form));

    let handler = PersonsEdit {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_edit,
        &handler,
        context("Persons.Edit", bag, headers),
    )
    .await
}

/// GET /persons/delete/{person_id}
pub async fn persons_delete_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<PersonId>,
) -> HandlerResult {
    let handler = PersonsDeleteForm {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_delete_form,
        &handler,
        context("Persons.Delete", person_id_bag(person_id), headers),
    )
    .await
}

/// POST /persons/delete/{person_id}
pub async fn persons_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(person_id): Path<PersonId>,
) -> HandlerResult {
    let handler = PersonsDelete {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_delete,
        &handler,
        context("Persons.Delete", person_id_bag(person_id), headers),
    )
    .await
}

/// GET /persons/persons-pdf
pub async fn persons_pdf(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let handler = PersonsPdf {
        persons: state.persons.clone(),
        renderer: state.pdf.clone(),
    };
    run(
        &state.pipelines.persons_pdf,
        &handler,
        context("Persons.PersonsPDF", ArgumentBag::new(), headers),
    )
    .await
}

/// GET /persons/persons-csv
pub async fn persons_csv(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let handler = PersonsCsv {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_csv,
        &handler,
        context("Persons.PersonsCSV", ArgumentBag::new(), headers),
    )
    .await
}

/// GET /persons/persons-excel
pub async fn persons_excel(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let handler = PersonsExcel {
        persons: state.persons.clone(),
    };
    run(
        &state.pipelines.persons_excel,
        &handler,
        context("Persons.PersonsExcel", ArgumentBag::new(), headers),
    )
    .await
}

// =============================================================================
// Countries
// =============================================================================

/// GET /countries
pub async fn countries_index(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let handler = CountriesIndex {
        countries: state.countries.clone(),
    };
    run(
        &state.pipelines.countries_index,
        &handler,
        context("Countries.Index", ArgumentBag::new(), headers),
    )
    .await
}

/// GET /countries/upload-from-excel
pub async fn countries_upload_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    run(
        &state.pipelines.countries_upload_form,
        &CountriesUploadForm,
        context("Countries.UploadFromExcel", ArgumentBag::new(), headers),
    )
    .await
}

/// POST /countries/upload-from-excel (multipart, field `excelFile`)
pub async fn countries_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> HandlerResult {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(EXCEL_FILE_ARGUMENT) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        file = Some(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    let mut bag = ArgumentBag::new();
    bag.insert(
        EXCEL_FILE_ARGUMENT,
        file.as_ref()
            .and_then(|f| f.file_name.clone())
            .map(Value::from)
            .unwrap_or(Value::Null),
    );

    let handler = CountriesUpload {
        countries: state.countries.clone(),
        file,
    };
    run(
        &state.pipelines.countries_upload,
        &handler,
        context("Countries.UploadFromExcel", bag, headers),
    )
    .await
}
