//! Tests for db::factory and db::repo_config - repository creation and configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use hotel_booking::db::repository::InventoryRepository;
use hotel_booking::db::{
    RepositoryBuilder, RepositoryConfig, RepositoryError, RepositoryFactory, RepositoryType,
};

#[test]
fn test_repository_type_from_str() {
    assert_eq!(
        RepositoryType::from_str("POSTGRES").unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(
        RepositoryType::from_str("pg").unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(
        RepositoryType::from_str("Local").unwrap(),
        RepositoryType::Local
    );

    let err = RepositoryType::from_str("mysql").unwrap_err();
    assert!(err.contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", Some("postgres://localhost/booking")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres),
    );
}

#[test]
fn test_repository_type_from_env_explicit_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/booking")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_invalid_defaults_to_local() {
    support::with_scoped_env(&[("REPOSITORY_TYPE", Some("invalid"))], || {
        assert_eq!(RepositoryType::from_env(), RepositoryType::Local)
    });
}

#[tokio::test]
async fn test_create_local_via_factory() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_builder_from_env_local() {
    let builder = support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || RepositoryBuilder::new().from_env(),
    );
    let repo = builder.unwrap().build().await.unwrap();
    assert!(repo.list_hotels().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_from_config_file_local() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"local\"").unwrap();

    let repo = RepositoryFactory::from_config_file(file.path())
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[test]
fn test_config_file_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repository.toml");
    std::fs::write(
        &path,
        "[repository]\ntype = \"postgres\"\n\n[postgres]\ndatabase_url = \"postgres://db/booking\"\n",
    )
    .unwrap();

    let config = RepositoryConfig::from_file(&path).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
    assert_eq!(config.postgres.database_url, "postgres://db/booking");
    assert_eq!(config.postgres.max_connections, 10);
    assert_eq!(config.postgres.min_connections, 1);
    assert_eq!(config.postgres.connect_timeout, 30);
    assert_eq!(config.postgres.idle_timeout, 600);
    assert_eq!(config.postgres.max_retries, 3);
    assert_eq!(config.postgres.retry_delay_ms, 100);
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RepositoryConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[test]
fn test_malformed_config_file_is_configuration_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository\ntype = ").unwrap();

    let err = RepositoryConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
}

#[tokio::test]
async fn test_unknown_type_in_config_file_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"sqlite\"").unwrap();

    let result = RepositoryFactory::from_config_file(file.path()).await;
    match result {
        Err(RepositoryError::ConfigurationError { message, .. }) => {
            assert!(message.contains("Invalid repository type"))
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("sqlite should be rejected"),
    }
}

#[cfg(feature = "postgres-repo")]
#[tokio::test]
async fn test_create_postgres_without_config_fails() {
    match RepositoryFactory::create(RepositoryType::Postgres, None).await {
        Err(err) => assert!(err.to_string().contains("requires PostgresConfig")),
        Ok(_) => panic!("postgres without config should fail"),
    }
}

#[cfg(feature = "postgres-repo")]
#[test]
fn test_postgres_config_from_env() {
    use hotel_booking::db::PostgresConfig;

    let config = support::with_scoped_env(
        &[
            ("DATABASE_URL", Some("postgres://booking@localhost/booking")),
            ("PG_POOL_MAX", Some("4")),
            ("PG_MAX_RETRIES", Some("not-a-number")),
        ],
        PostgresConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.database_url, "postgres://booking@localhost/booking");
    assert_eq!(config.max_pool_size, 4);
    assert_eq!(config.max_retries, 3);
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_create_postgres_without_feature_fails() {
    match RepositoryFactory::create(RepositoryType::Postgres, None).await {
        Err(err) => assert!(err.to_string().contains("feature not enabled")),
        Ok(_) => panic!("postgres backend is not compiled in"),
    }
}
