//! Postgres repository implementation using Diesel.
//!
//! Tables `countries` and `persons` are created by the embedded migrations.
//! Person reads left-join the country so the navigation property is filled
//! in one round trip.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tracing::warn;

use crate::api::PersonField;
use crate::db::repository::{
    CountriesRepository, ErrorContext, PersonFilter, PersonsRepository, RepositoryError,
    RepositoryResult,
};
use crate::models::{Country, CountryId, Person, PersonId};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// `to_char` pattern matching the in-memory `"%d %B %Y"` rendering.
const DATE_SEARCH_SQL: &str = "to_char(persons.date_of_birth, 'DD FMMonth YYYY')";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_MAX_RETRIES`: Maximum retry attempts (default: 3)
    /// - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Parse an optional numeric variable, keeping `default` when unset or malformed.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Shared query counters, cloned into every blocking task.
#[derive(Debug, Default)]
struct QueryCounters {
    total: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
}

/// Diesel-backed repository for Postgres.
///
/// Each call borrows one pooled connection inside `spawn_blocking` and
/// returns it on drop. Transient failures (pool exhaustion, serialization
/// conflicts) are retried with exponential backoff up to
/// [`PostgresConfig::max_retries`] times.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    counters: Arc<QueryCounters>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        let mut conn = pool.get().map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("get_connection_for_migrations"),
            )
        })?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        drop(conn);

        Ok(Self {
            pool,
            config,
            counters: Arc::new(QueryCounters::default()),
        })
    }

    /// Run `f` on a pooled connection, retrying transient failures.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let mut retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let counters = self.counters.clone();

        task::spawn_blocking(move || {
            let mut attempt = 0;
            loop {
                let outcome = match pool.get() {
                    Ok(mut conn) => {
                        counters.total.fetch_add(1, Ordering::Relaxed);
                        f.clone()(&mut conn)
                    }
                    Err(e) => Err(RepositoryError::connection_with_context(
                        e.to_string(),
                        ErrorContext::new("get_connection")
                            .with_details(format!("attempt={}", attempt + 1)),
                    )),
                };

                match outcome {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        attempt += 1;
                        counters.retried.fetch_add(1, Ordering::Relaxed);
                        warn!(attempt, error = %e, "Retrying Postgres operation");
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                    }
                    Err(e) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                    Ok(value) => return Ok(value),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool state and query statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.counters.total.load(Ordering::Relaxed),
            failed_queries: self.counters.failed.load(Ordering::Relaxed),
            retried_operations: self.counters.retried.load(Ordering::Relaxed),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// `ILIKE` pattern for a substring search, with wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn load_person(conn: &mut PgConnection, person_id: PersonId) -> RepositoryResult<Option<Person>> {
    persons::table
        .left_join(countries::table)
        .filter(persons::person_id.eq(person_id.value()))
        .select((PersonRow::as_select(), Option::<CountryRow>::as_select()))
        .first::<(PersonRow, Option<CountryRow>)>(conn)
        .optional()
        .map(|row| row.map(|(person, country)| person.into_person(country)))
        .map_err(map_diesel_error)
}

#[async_trait]
impl CountriesRepository for PostgresRepository {
    async fn add_country(&self, country: Country) -> RepositoryResult<Country> {
        let row = CountryRow::from(&country);
        self.with_conn(move |conn| {
            diesel::insert_into(countries::table)
                .values(&row)
                .returning(CountryRow::as_returning())
                .get_result::<CountryRow>(conn)
                .map(Country::from)
                .map_err(|e| map_diesel_error(e).with_operation("add_country"))
        })
        .await
    }

    async fn get_all_countries(&self) -> RepositoryResult<Vec<Country>> {
        self.with_conn(|conn| {
            countries::table
                .select(CountryRow::as_select())
                .load::<CountryRow>(conn)
                .map(|rows| rows.into_iter().map(Country::from).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_country_by_country_id(
        &self,
        country_id: CountryId,
    ) -> RepositoryResult<Option<Country>> {
        self.with_conn(move |conn| {
            countries::table
                .find(country_id.value())
                .select(CountryRow::as_select())
                .first::<CountryRow>(conn)
                .optional()
                .map(|row| row.map(Country::from))
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_country_by_country_name(
        &self,
        country_name: &str,
    ) -> RepositoryResult<Option<Country>> {
        let country_name = country_name.to_string();
        self.with_conn(move |conn| {
            countries::table
                .filter(countries::country_name.eq(&country_name))
                .select(CountryRow::as_select())
                .first::<CountryRow>(conn)
                .optional()
                .map(|row| row.map(Country::from))
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl PersonsRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn add_person(&self, person: Person) -> RepositoryResult<Person> {
        let row = NewPersonRow::from(&person);
        let person_id = person.person_id;
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                diesel::insert_into(persons::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|e| map_diesel_error(e).with_operation("add_person"))?;
                load_person(tx, person_id)?.ok_or_else(|| {
                    RepositoryError::internal_with_context(
                        "Inserted person could not be read back",
                        ErrorContext::new("add_person")
                            .with_entity("person")
                            .with_entity_id(person_id),
                    )
                })
            })
        })
        .await
    }

    async fn get_all_persons(&self) -> RepositoryResult<Vec<Person>> {
        self.with_conn(|conn| {
            persons::table
                .left_join(countries::table)
                .select((PersonRow::as_select(), Option::<CountryRow>::as_select()))
                .load::<(PersonRow, Option<CountryRow>)>(conn)
                .map(|rows| {
                    rows.into_iter()
                        .map(|(person, country)| person.into_person(country))
                        .collect()
                })
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_person_by_person_id(
        &self,
        person_id: PersonId,
    ) -> RepositoryResult<Option<Person>> {
        self.with_conn(move |conn| load_person(conn, person_id)).await
    }

    async fn get_filtered_persons(&self, filter: &PersonFilter) -> RepositoryResult<Vec<Person>> {
        let field = filter.field();
        let pattern = contains_pattern(filter.needle());
        self.with_conn(move |conn| {
            let mut query = persons::table
                .left_join(countries::table)
                .select((PersonRow::as_select(), Option::<CountryRow>::as_select()))
                .into_boxed();

            query = match field {
                PersonField::PersonName => {
                    query.filter(persons::person_name.ilike(pattern.clone()))
                }
                PersonField::Email => query.filter(persons::email.ilike(pattern.clone())),
                PersonField::DateOfBirth => {
                    query.filter(sql::<Text>(DATE_SEARCH_SQL).ilike(pattern.clone()))
                }
                PersonField::Gender => query.filter(persons::gender.ilike(pattern.clone())),
                PersonField::Country => {
                    query.filter(countries::country_name.nullable().ilike(pattern.clone()))
                }
                PersonField::Address => query.filter(persons::address.ilike(pattern.clone())),
                PersonField::Age | PersonField::ReceiveNewsLetters => query,
            };

            query
                .load::<(PersonRow, Option<CountryRow>)>(conn)
                .map(|rows| {
                    rows.into_iter()
                        .map(|(person, country)| person.into_person(country))
                        .collect()
                })
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn update_person(&self, person: Person) -> RepositoryResult<Person> {
        let changes = PersonChangeset::from(&person);
        let person_id = person.person_id;
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let updated = diesel::update(persons::table.find(person_id.value()))
                    .set(&changes)
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                if updated == 0 {
                    return Err(RepositoryError::not_found_with_context(
                        "Person not found",
                        ErrorContext::new("update_person")
                            .with_entity("person")
                            .with_entity_id(person_id),
                    ));
                }
                load_person(tx, person_id)?.ok_or_else(|| {
                    RepositoryError::internal_with_context(
                        "Updated person could not be read back",
                        ErrorContext::new("update_person").with_entity_id(person_id),
                    )
                })
            })
        })
        .await
    }

    async fn delete_person_by_person_id(&self, person_id: PersonId) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            diesel::delete(persons::table.find(person_id.value()))
                .execute(conn)
                .map(|deleted| deleted > 0)
                .map_err(map_diesel_error)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn config_with_url_keeps_pool_defaults() {
        let config = PostgresConfig::with_url("postgres://localhost/people");
        assert_eq!(config.database_url, "postgres://localhost/people");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.max_retries, 3);
    }
}
