//! Require a running PostgreSQL (DATABASE_URL, defaults to localhost:5433).
//! Run with `cargo test -- --ignored`.

mod common;

use std::sync::Arc;

use account_service::account::errors::AccountError;
use account_service::account::models::AccountId;
use account_service::account::models::AccountTag;
use account_service::account::models::HashedPassword;
use account_service::account::models::NewAccount;
use account_service::account::models::UpdateAccountCommand;
use account_service::account::models::Username;
use account_service::account::ports::AccountRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use common::TestApp;
use common::TestDb;
use futures::future::join_all;
use reqwest::StatusCode;

fn new_account(username: &str) -> NewAccount {
    NewAccount::new(
        Username::new(username).unwrap(),
        HashedPassword::new("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string()),
    )
}

#[tokio::test]
#[ignore]
async fn test_create_and_find() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository.create(new_account("alice")).await.unwrap();
    assert_eq!(alice.id, AccountId(1));

    let by_id = repository.find_by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, alice.username);
    assert_eq!(by_id.status.as_str(), "active");
    assert_eq!(by_id.role.as_str(), "user");

    let by_name = repository
        .find_by_username(&Username::new("alice").unwrap())
        .await
        .unwrap();
    assert_eq!(by_name.map(|a| a.id), Some(alice.id));

    // Stored timestamp matches the one returned at creation
    assert_eq!(by_id.created_at, alice.created_at);

    let other_case = repository
        .find_by_username(&Username::new("ALICE").unwrap())
        .await
        .unwrap();
    assert!(other_case.is_none());
}

#[tokio::test]
#[ignore]
async fn test_unique_constraint_maps_to_username_taken() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    repository.create(new_account("alice")).await.unwrap();
    let result = repository.create(new_account("alice")).await;

    assert!(matches!(result, Err(AccountError::UsernameTaken(name)) if name == "alice"));
}

#[tokio::test]
#[ignore]
async fn test_rename_conflict_and_exclusion() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository.create(new_account("alice")).await.unwrap();
    let bob = repository.create(new_account("bob")).await.unwrap();

    let alice_name = Username::new("alice").unwrap();
    assert!(repository.username_exists(&alice_name, None).await.unwrap());
    assert!(repository
        .username_exists(&alice_name, Some(bob.id))
        .await
        .unwrap());
    assert!(!repository
        .username_exists(&alice_name, Some(alice.id))
        .await
        .unwrap());

    let changes = UpdateAccountCommand {
        username: Some(alice_name),
        ..Default::default()
    };
    let result = repository.update(&bob.id, changes).await;
    assert!(matches!(result, Err(AccountError::UsernameTaken(_))));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_partial_updates_keep_both_fields() {
    let db = TestDb::new().await;
    let repository = Arc::new(PostgresAccountRepository::new(db.pool.clone()));
    let id = repository.create(new_account("alice")).await.unwrap().id;

    let updates = (0..10).map(|i| {
        let changes = if i % 2 == 0 {
            UpdateAccountCommand {
                status: Some(AccountTag::new("suspended").unwrap()),
                ..Default::default()
            }
        } else {
            UpdateAccountCommand {
                role: Some(AccountTag::new("admin").unwrap()),
                ..Default::default()
            }
        };
        let repository = Arc::clone(&repository);
        async move { repository.update(&id, changes).await }
    });

    for result in join_all(updates).await {
        result.unwrap();
    }

    let stored = repository.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.username.as_str(), "alice");
    assert_eq!(stored.status.as_str(), "suspended");
    assert_eq!(stored.role.as_str(), "admin");
}

#[tokio::test]
#[ignore]
async fn test_update_password_hash_and_delete() {
    let db = TestDb::new().await;
    let repository = PostgresAccountRepository::new(db.pool.clone());

    let alice = repository.create(new_account("alice")).await.unwrap();
    let new_hash = HashedPassword::new("$argon2id$v=19$m=16,t=1,p=1$bmV3c2FsdA$bmV3".to_string());

    repository
        .update_password_hash(&alice.id, &new_hash)
        .await
        .unwrap();
    let stored = repository.find_by_id(&alice.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, new_hash);

    repository.delete(&alice.id).await.unwrap();
    assert!(matches!(
        repository.delete(&alice.id).await,
        Err(AccountError::NotFound(_))
    ));
    assert!(matches!(
        repository.update_password_hash(&alice.id, &new_hash).await,
        Err(AccountError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_registrations_against_postgres() {
    let db = TestDb::new().await;
    let app =
        TestApp::spawn_with_repository(Arc::new(PostgresAccountRepository::new(db.pool.clone())))
            .await;

    let responses = join_all((0..10).map(|_| app.register("alice", "secret1"))).await;

    let created = responses
        .iter()
        .filter(|r| r.status() == StatusCode::CREATED)
        .count();
    let conflicts = responses
        .iter()
        .filter(|r| r.status() == StatusCode::CONFLICT)
        .count();

    assert_eq!(created, 1);
    assert_eq!(conflicts, 9);
}
