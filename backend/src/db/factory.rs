//! Picks and opens the booking store.
//!
//! The server calls this once at startup and injects the resulting
//! `Arc<dyn FullRepository>` into its handler state.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::info;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Which backend holds hotels, rooms, users and reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    Postgres,
    /// In-memory, lost on restart
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// `postgres`, `pg` or `local`, ignoring case and surrounding spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` if set (unparseable means Local). Otherwise Postgres
    /// when `DATABASE_URL` or `PG_DATABASE_URL` is present, else Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        let has_url = ["DATABASE_URL", "PG_DATABASE_URL"]
            .iter()
            .any(|key| std::env::var(key).is_ok());
        if has_url {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration("Postgres repository feature not enabled")
}

fn invalid_type(e: String) -> RepositoryError {
    RepositoryError::configuration(format!("Invalid repository type: {}", e))
}

#[cfg(feature = "postgres-repo")]
fn postgres_from_env() -> RepositoryResult<PostgresConfig> {
    PostgresConfig::from_env().map_err(RepositoryError::configuration)
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_from_env() -> RepositoryResult<PostgresConfig> {
    Err(postgres_disabled())
}

/// Opens a store of the requested type.
///
/// ```
/// use hotel_booking::db::{InventoryRepository, RepositoryFactory, RepositoryType};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).await?;
/// assert!(repo.health_check().await?);
/// # Ok(())
/// # }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// `postgres_config` is only read for [`RepositoryType::Postgres`], where
    /// it is mandatory.
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => Self::open_postgres(postgres_config).await,
        }
    }

    #[cfg(feature = "postgres-repo")]
    async fn open_postgres(
        config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = config.ok_or_else(|| {
            RepositoryError::configuration("Postgres repository requires PostgresConfig")
        })?;
        let repo: Arc<dyn FullRepository> = Self::create_postgres(config).await?;
        Ok(repo)
    }

    #[cfg(not(feature = "postgres-repo"))]
    async fn open_postgres(
        _config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(postgres_disabled())
    }

    /// Connects the pool and applies pending migrations.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let repo = PostgresRepository::new(config.clone())?;
        info!("Using Postgres repository");
        Ok(Arc::new(repo))
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        info!("Using in-memory repository");
        Arc::new(LocalRepository::new())
    }

    /// See [`RepositoryType::from_env`] and [`PostgresConfig`] for the variables read.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_env()?.build().await
    }

    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new()
            .from_config_file(config_path)?
            .build()
            .await
    }

    /// Uses the first file [`RepositoryConfig::from_default_location`] finds.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_default_config()?.build().await
    }
}

/// Collects the backend choice and its settings before opening the store.
///
/// ```ignore
/// // With the `postgres-repo` feature:
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Postgres)
///     .postgres_config(PostgresConfig::with_url("postgres://localhost/booking"))
///     .build()
///     .await?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    postgres_config: Option<PostgresConfig>,
}

impl RepositoryBuilder {
    /// Starts from [`RepositoryType::from_env`] with no Postgres settings.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            postgres_config: None,
        }
    }

    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn postgres_config(mut self, config: PostgresConfig) -> Self {
        self.postgres_config = Some(config);
        self
    }

    pub fn from_env(mut self) -> RepositoryResult<Self> {
        self.repo_type = RepositoryType::from_env();
        self.postgres_config = match self.repo_type {
            RepositoryType::Postgres => Some(postgres_from_env()?),
            RepositoryType::Local => None,
        };
        Ok(self)
    }

    pub fn from_config_file<P: AsRef<Path>>(self, config_path: P) -> RepositoryResult<Self> {
        let file = RepositoryConfig::from_file(config_path)?;
        self.apply(&file)
    }

    pub fn from_default_config(self) -> RepositoryResult<Self> {
        let file = RepositoryConfig::from_default_location()?;
        self.apply(&file)
    }

    fn apply(mut self, file: &RepositoryConfig) -> RepositoryResult<Self> {
        self.repo_type = file.repository_type().map_err(invalid_type)?;
        // Errors for postgres without a URL or without the backend compiled in.
        self.postgres_config = file.to_postgres_config()?;
        Ok(self)
    }

    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.postgres_config.as_ref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
