//! Country use cases, including the spreadsheet import.

use std::io::Cursor;
use std::sync::Arc;

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use crate::api::{CountryAddRequest, CountryOption, CountryResponse};
use crate::db::CountriesRepository;
use crate::models::CountryId;

/// Worksheet read by [`CountriesService::upload_countries_from_excel`].
pub const IMPORT_SHEET_NAME: &str = "Countries";

#[derive(Clone)]
pub struct CountriesService {
    repo: Arc<dyn CountriesRepository>,
}

impl CountriesService {
    pub fn new(repo: Arc<dyn CountriesRepository>) -> Self {
        Self { repo }
    }

    /// Insert a country whose name is not stored yet.
    ///
    /// The lookup and the insert are separate calls, so two concurrent adds
    /// of the same name can both succeed.
    ///
    /// # Errors
    /// `ServiceError::Conflict` when the name is missing or already stored
    /// (exact, case-sensitive match).
    pub async fn add_country(&self, request: CountryAddRequest) -> ServiceResult<CountryResponse> {
        let name = request
            .country_name
            .as_deref()
            .ok_or_else(|| ServiceError::Conflict("Country name can't be blank".to_string()))?;

        if self.repo.get_country_by_country_name(name).await?.is_some() {
            return Err(ServiceError::Conflict(
                "Given country name already exists".to_string(),
            ));
        }

        let stored = self
            .repo
            .add_country(request.to_country(CountryId::generate()))
            .await?;
        info!(country_id = %stored.country_id, country_name = name, "Country added");
        Ok(CountryResponse::from(stored))
    }

    pub async fn get_all_countries(&self) -> ServiceResult<Vec<CountryResponse>> {
        let countries = self.repo.get_all_countries().await?;
        Ok(countries.into_iter().map(CountryResponse::from).collect())
    }

    /// Every country as a drop-down entry, in store order.
    pub async fn get_country_options(&self) -> ServiceResult<Vec<CountryOption>> {
        let countries = self.get_all_countries().await?;
        Ok(countries.iter().map(CountryOption::from).collect())
    }

    pub async fn get_country_by_country_id(
        &self,
        country_id: CountryId,
    ) -> ServiceResult<Option<CountryResponse>> {
        let country = self.repo.get_country_by_country_id(country_id).await?;
        Ok(country.map(CountryResponse::from))
    }

    pub async fn get_country_by_country_name(
        &self,
        country_name: &str,
    ) -> ServiceResult<Option<CountryResponse>> {
        let country = self.repo.get_country_by_country_name(country_name).await?;
        Ok(country.map(CountryResponse::from))
    }

    /// Import country names from column A of the `"Countries"` worksheet,
    /// starting at the second row.
    ///
    /// Blank cells and names already stored are skipped.
    ///
    /// # Returns
    /// The number of countries inserted.
    pub async fn upload_countries_from_excel(&self, workbook_bytes: &[u8]) -> ServiceResult<usize> {
        let names = read_country_names(workbook_bytes)?;
        debug!(candidates = names.len(), "Read country names from workbook");

        let mut inserted = 0;
        for name in names {
            if self.repo.get_country_by_country_name(&name).await?.is_some() {
                continue;
            }
            self.repo
                .add_country(CountryAddRequest::new(name).to_country(CountryId::generate()))
                .await?;
            inserted += 1;
        }

        info!(inserted, "Countries uploaded from workbook");
        Ok(inserted)
    }
}

/// Non-blank column A values of the import sheet, rows 2 and below.
fn read_country_names(workbook_bytes: &[u8]) -> ServiceResult<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(workbook_bytes))
        .map_err(|e| ServiceError::InvalidArgument(format!("Unreadable workbook: {}", e)))?;
    let range = workbook
        .worksheet_range(IMPORT_SHEET_NAME)
        .map_err(|e| ServiceError::InvalidArgument(format!("Unreadable worksheet: {}", e)))?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    Ok((1..=last_row)
        .filter_map(|row| range.get_value((row, 0)))
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}
