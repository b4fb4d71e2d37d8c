//! Action handlers: the routed work at the center of each pipeline.
//!
//! Handlers read their inputs from the argument bag after the filters have
//! run, so any normalization a filter applied is what the handler sees.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use tracing::{debug, info};

use crate::api::{PersonAddRequest, PersonField, PersonUpdateRequest, SortOrder};
use crate::models::PersonId;
use crate::pipeline::filters::PERSON_REQUEST_ARGUMENT;
use crate::pipeline::{ActionContext, ActionError, ActionHandler, ActionOutcome, ActionResult};
use crate::services::{CountriesService, PdfRenderer, PersonsService};

/// Where create, edit and delete return to.
pub const PERSONS_INDEX_PATH: &str = "/persons/index";

/// Argument holding the person identity taken from the route.
pub const PERSON_ID_ARGUMENT: &str = "personId";

/// Argument holding the uploaded workbook's file name.
pub const EXCEL_FILE_ARGUMENT: &str = "excelFile";

pub const CSV_CONTENT_TYPE: &str = "application/octet-stream";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

async fn countries_view_data(
    countries: &CountriesService,
    result: ActionResult,
) -> ActionOutcome {
    let options = countries.get_country_options().await?;
    Ok(result.with_view_data(
        "Countries",
        serde_json::to_value(&options).unwrap_or_default(),
    ))
}

fn person_id(ctx: &ActionContext) -> Result<PersonId, ActionError> {
    ctx.arguments.decode(PERSON_ID_ARGUMENT)
}

/// Search, then sort, the persons list.
pub struct PersonsIndex {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsIndex {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        let search_by = ctx.arguments.get_str("searchBy").unwrap_or_default();
        let search_string = ctx.arguments.get_str("searchString");
        let sort_by = ctx
            .arguments
            .get_str("sortBy")
            .unwrap_or_else(|| PersonField::PersonName.key().to_string());
        let sort_order: SortOrder = ctx
            .arguments
            .get_str("sortOrder")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        info!("Index action of persons");
        debug!(
            search_by = %search_by,
            search_string = ?search_string,
            sort_by = %sort_by,
            sort_order = %sort_order,
            "List arguments"
        );

        let persons = self
            .persons
            .get_filtered_persons(&search_by, search_string.as_deref())
            .await?;
        let sorted = self.persons.get_sorted_persons(persons, &sort_by, sort_order);
        Ok(ActionResult::view("Index", &sorted))
    }
}

/// Empty create form with the country drop-down.
pub struct PersonsCreateForm {
    pub countries: CountriesService,
}

#[async_trait]
impl ActionHandler for PersonsCreateForm {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        let form = ActionResult::view("Create", &PersonAddRequest::default());
        countries_view_data(&self.countries, form).await
    }
}

pub struct PersonsCreate {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsCreate {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        let request: PersonAddRequest = ctx.arguments.decode(PERSON_REQUEST_ARGUMENT)?;
        self.persons.add_person(request).await?;
        Ok(ActionResult::redirect(PERSONS_INDEX_PATH))
    }
}

/// Edit form prefilled from the stored person; unknown ids go back to the list.
pub struct PersonsEditForm {
    pub persons: PersonsService,
    pub countries: CountriesService,
}

#[async_trait]
impl ActionHandler for PersonsEditForm {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        let Some(person) = self.persons.get_person_by_person_id(person_id(ctx)?).await? else {
            return Ok(ActionResult::redirect(PERSONS_INDEX_PATH));
        };
        let form = ActionResult::view("Edit", &person.to_person_update_request());
        countries_view_data(&self.countries, form).await
    }
}

pub struct PersonsEdit {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsEdit {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        let request: PersonUpdateRequest = ctx.arguments.decode(PERSON_REQUEST_ARGUMENT)?;
        let Some(person_id) = request.person_id else {
            return Ok(ActionResult::redirect(PERSONS_INDEX_PATH));
        };
        if self.persons.get_person_by_person_id(person_id).await?.is_none() {
            return Ok(ActionResult::redirect(PERSONS_INDEX_PATH));
        }
        self.persons.update_person(request).await?;
        Ok(ActionResult::redirect(PERSONS_INDEX_PATH))
    }
}

/// Delete confirmation view.
pub struct PersonsDeleteForm {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsDeleteForm {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        match self.persons.get_person_by_person_id(person_id(ctx)?).await? {
            Some(person) => Ok(ActionResult::view("Delete", &person)),
            None => Ok(ActionResult::redirect(PERSONS_INDEX_PATH)),
        }
    }
}

pub struct PersonsDelete {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsDelete {
    async fn handle(&self, ctx: &mut ActionContext) -> ActionOutcome {
        let person_id = person_id(ctx)?;
        if !self.persons.delete_person(person_id).await? {
            debug!(person_id = %person_id, "Delete of unknown person");
        }
        Ok(ActionResult::redirect(PERSONS_INDEX_PATH))
    }
}

pub struct PersonsPdf {
    pub persons: PersonsService,
    pub renderer: Arc<dyn PdfRenderer>,
}

#[async_trait]
impl ActionHandler for PersonsPdf {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        let bytes = self.persons.get_persons_pdf(self.renderer.as_ref()).await?;
        Ok(ActionResult::File {
            content_type: PDF_CONTENT_TYPE,
            file_name: "persons.pdf".to_string(),
            bytes,
        })
    }
}

pub struct PersonsCsv {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsCsv {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        Ok(ActionResult::File {
            content_type: CSV_CONTENT_TYPE,
            file_name: "persons.csv".to_string(),
            bytes: self.persons.get_persons_csv().await?,
        })
    }
}

pub struct PersonsExcel {
    pub persons: PersonsService,
}

#[async_trait]
impl ActionHandler for PersonsExcel {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        Ok(ActionResult::File {
            content_type: XLSX_CONTENT_TYPE,
            file_name: "persons.xlsx".to_string(),
            bytes: self.persons.get_persons_excel().await?,
        })
    }
}

pub struct CountriesIndex {
    pub countries: CountriesService,
}

#[async_trait]
impl ActionHandler for CountriesIndex {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        let countries = self.countries.get_all_countries().await?;
        Ok(ActionResult::view("Countries", &countries))
    }
}

/// Empty upload form.
pub struct CountriesUploadForm;

#[async_trait]
impl ActionHandler for CountriesUploadForm {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        Ok(ActionResult::view("UploadFromExcel", &serde_json::Value::Null))
    }
}

/// A file part taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Country import from an uploaded `.xlsx` workbook.
pub struct CountriesUpload {
    pub countries: CountriesService,
    pub file: Option<UploadedFile>,
}

impl CountriesUpload {
    fn message(text: String) -> ActionResult {
        ActionResult::view("UploadFromExcel", &serde_json::Value::Null).with_view_data("Message", text)
    }

    fn rejection(text: &str) -> ActionResult {
        ActionResult::view("UploadFromExcel", &serde_json::Value::Null)
            .with_status(StatusCode::BAD_REQUEST)
            .with_view_data("ErrorMessage", text)
    }
}

#[async_trait]
impl ActionHandler for CountriesUpload {
    async fn handle(&self, _ctx: &mut ActionContext) -> ActionOutcome {
        let Some(file) = self.file.as_ref().filter(|f| !f.bytes.is_empty()) else {
            return Ok(Self::rejection("Please select an xlsx file"));
        };

        let is_xlsx = file
            .file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            return Ok(Self::rejection("Unsupported file. 'xlsx' file is expected"));
        }

        let inserted = self.countries.upload_countries_from_excel(&file.bytes).await?;
        Ok(Self::message(format!("{} Countries Uploaded", inserted)))
    }
}
