//! Startup seeding from JSON documents.
//!
//! Seed files use the PascalCase keys of the original data set:
//!
//! ```json
//! [{ "CountryID": "…", "CountryName": "Philippines" }]
//! ```
//!
//! Rows whose identity already exists are skipped, so seeding is safe to
//! run against a populated store.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, RepositorySet};
use crate::models::{Country, CountryId, Person, PersonId};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedCountry {
    #[serde(rename = "CountryID")]
    pub country_id: CountryId,
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedPerson {
    #[serde(rename = "PersonID")]
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    #[serde(rename = "CountryID")]
    pub country_id: Option<CountryId>,
    pub address: Option<String>,
    #[serde(default)]
    pub receive_news_letters: bool,
    #[serde(default, rename = "TIN")]
    pub tin: Option<String>,
}

impl From<SeedPerson> for Person {
    fn from(seed: SeedPerson) -> Self {
        Person {
            person_id: seed.person_id,
            person_name: seed.person_name,
            email: seed.email,
            date_of_birth: seed.date_of_birth,
            gender: seed.gender,
            country_id: seed.country_id,
            address: seed.address,
            receive_news_letters: seed.receive_news_letters,
            tin: seed.tin,
            country: None,
        }
    }
}

/// Rows inserted by one seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub countries: usize,
    pub persons: usize,
}

async fn read_seed<T>(path: &Path) -> RepositoryResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let context = || ErrorContext::new("read_seed").with_details(path.display().to_string());
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        RepositoryError::internal_with_context(format!("Failed to read seed file: {}", e), context())
    })?;
    serde_json::from_str(&content).map_err(|e| {
        RepositoryError::internal_with_context(
            format!("Failed to parse seed file: {}", e),
            context(),
        )
    })
}

/// Insert seed rows that are not yet present.
///
/// # Arguments
/// * `repos` - Target store
/// * `countries_path` - Optional path to the countries document
/// * `persons_path` - Optional path to the persons document
pub async fn seed_from_files(
    repos: &RepositorySet,
    countries_path: Option<&Path>,
    persons_path: Option<&Path>,
) -> RepositoryResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    if let Some(path) = countries_path {
        for seed in read_seed::<SeedCountry>(path).await? {
            if repos
                .countries
                .get_country_by_country_id(seed.country_id)
                .await?
                .is_some()
            {
                debug!(country_id = %seed.country_id, "Seed country already present");
                continue;
            }
            repos
                .countries
                .add_country(Country {
                    country_id: seed.country_id,
                    country_name: seed.country_name,
                })
                .await?;
            summary.countries += 1;
        }
    }

    if let Some(path) = persons_path {
        for seed in read_seed::<SeedPerson>(path).await? {
            if repos
                .persons
                .get_person_by_person_id(seed.person_id)
                .await?
                .is_some()
            {
                debug!(person_id = %seed.person_id, "Seed person already present");
                continue;
            }
            repos.persons.add_person(seed.into()).await?;
            summary.persons += 1;
        }
    }

    info!(
        countries = summary.countries,
        persons = summary.persons,
        "Seed data loaded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RepositoryFactory;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let countries = write_temp(
            r#"[{"CountryID": "00000000-0000-0000-0000-000000000001", "CountryName": "Brazil"}]"#,
        );
        let persons = write_temp(
            r#"[{
                "PersonID": "00000000-0000-0000-0000-0000000000aa",
                "PersonName": "Joao",
                "Email": "joao@example.com",
                "DateOfBirth": "1985-07-21",
                "Gender": "Male",
                "CountryID": "00000000-0000-0000-0000-000000000001",
                "Address": "Rua 1",
                "ReceiveNewsLetters": true
            }]"#,
        );
        let repos = RepositoryFactory::create_local();

        let first = seed_from_files(&repos, Some(countries.path()), Some(persons.path()))
            .await
            .unwrap();
        let second = seed_from_files(&repos, Some(countries.path()), Some(persons.path()))
            .await
            .unwrap();

        assert_eq!(first, SeedSummary { countries: 1, persons: 1 });
        assert_eq!(second, SeedSummary::default());

        let stored = repos.persons.get_all_persons().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].country_name(), Some("Brazil"));
    }

    #[tokio::test]
    async fn malformed_seed_is_reported() {
        let countries = write_temp("not json");
        let repos = RepositoryFactory::create_local();
        let err = seed_from_files(&repos, Some(countries.path()), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse seed file"));
    }
}
