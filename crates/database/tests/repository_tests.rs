//! Repository-level tests for the accounts database crate

use accounts_config::DatabaseConfig;
use accounts_database::{initialize_database, NewUser, StoreError, UniqueField, UserRepository};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Helper function to create a migrated test database
async fn create_test_database() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_users_repo.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 5,
    };

    let pool = initialize_database(&config)
        .await
        .expect("Failed to create test database");

    (pool, temp_dir)
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        ..NewUser::default()
    }
}

#[tokio::test]
async fn test_create_and_find_user() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let request = NewUser {
        name: Some("Alice".into()),
        email: Some("alice@example.com".into()),
        phone: Some("555-0100".into()),
        address: Some("1 Main St".into()),
        ..new_user("alice")
    };
    let created = repo.create(&request).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.username, "alice");
    assert_eq!(created.name.as_deref(), Some("Alice"));
    assert_eq!(created.email.as_deref(), Some("alice@example.com"));
    assert_eq!(created.phone.as_deref(), Some("555-0100"));
    assert_eq!(created.address.as_deref(), Some("1 Main St"));
    assert_eq!(created.password_hash, request.password_hash);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);
}

#[tokio::test]
async fn test_missing_users_return_none() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    assert!(repo.find_by_id(42).await.unwrap().is_none());
    assert!(repo.find_by_username("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_reported_as_conflict() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("alice")).await.unwrap();
    let err = repo.create(&new_user("alice")).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict(Some(UniqueField::Username))));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_email_and_phone_are_reported_by_field() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    repo.create(&NewUser {
        email: Some("shared@example.com".into()),
        phone: Some("555-0199".into()),
        ..new_user("first")
    })
    .await
    .unwrap();

    let email_err = repo
        .create(&NewUser {
            email: Some("shared@example.com".into()),
            ..new_user("second")
        })
        .await
        .unwrap_err();
    assert!(matches!(email_err, StoreError::Conflict(Some(UniqueField::Email))));

    let phone_err = repo
        .create(&NewUser {
            phone: Some("555-0199".into()),
            ..new_user("third")
        })
        .await
        .unwrap_err();
    assert!(matches!(phone_err, StoreError::Conflict(Some(UniqueField::Phone))));

    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_absent_optional_fields_do_not_collide() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    repo.create(&new_user("bob")).await.unwrap();
    repo.create(&new_user("carol")).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_concurrent_duplicate_inserts_leave_one_row() {
    let (pool, _temp_dir) = create_test_database().await;
    let repo = UserRepository::new(pool);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create(&new_user("racer")).await })
        })
        .collect();

    let mut successes = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StoreError::Conflict(Some(UniqueField::Username))) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(repo.count().await.unwrap(), 1);
}
