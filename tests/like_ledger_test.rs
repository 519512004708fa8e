//! Like ledger against SeaORM's mock database.
//!
//! Each case scripts the rows the ledger will read (the locked item, the
//! existing like) and the write results it expects, then inspects the
//! statements that were sent inside the transaction.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Transaction};

use clothing_catalog::domain::{Identity, LikeOutcome};
use clothing_catalog::errors::AppError;
use clothing_catalog::infra::repositories::entities::{clothing_item, item_like};
use clothing_catalog::infra::Persistence;
use clothing_catalog::services::{LikeLedger, LikeService};

fn item_row(id: i32, likes_count: i32) -> clothing_item::Model {
    clothing_item::Model {
        id,
        name: "Cool Hat".to_string(),
        description: "Very cool".to_string(),
        external_id: "42".to_string(),
        price: 50,
        item_type: "Pants".to_string(),
        tags: vec!["anime".to_string()],
        keywords: vec![],
        seller_id: Some(1),
        likes_count,
        created_at: Utc::now(),
    }
}

fn anonymous_like(id: i32, item_id: i32, key: &str) -> item_like::Model {
    item_like::Model {
        id,
        item_id,
        user_id: None,
        ip_address: Some(key.to_string()),
        created_at: Utc::now(),
    }
}

fn written(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

fn ledger(db: &Arc<DatabaseConnection>) -> LikeLedger<Persistence> {
    LikeLedger::new(Arc::new(Persistence::new(db.clone())))
}

/// Reclaims the mock once every ledger holding it has been dropped.
fn into_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::try_unwrap(db)
        .expect("connection still shared")
        .into_transaction_log()
}

fn statements(db: Arc<DatabaseConnection>) -> String {
    format!("{:?}", into_log(db))
}

#[tokio::test]
async fn test_first_like_inserts_and_increments() {
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![item_row(1, 4)]])
        .append_query_results([Vec::<item_like::Model>::new()])
        .append_exec_results([written(1), written(1)])
        .into_connection()
        .into();

    let receipt = ledger(&db)
        .like(1, Identity::Anonymous("203.0.113.9".into()))
        .await
        .unwrap();

    assert_eq!(receipt.outcome, LikeOutcome::Added);
    assert!(receipt.liked);
    assert_eq!(receipt.likes_count, 5);

    let log = statements(db);
    assert!(log.contains("FOR UPDATE"));
    assert!(log.contains("INSERT INTO"));
    assert!(log.contains("\\\"likes_count\\\" + "));
}

#[tokio::test]
async fn test_repeated_like_is_unchanged_and_writes_nothing() {
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![item_row(1, 1)]])
        .append_query_results([vec![anonymous_like(9, 1, "203.0.113.9")]])
        .into_connection()
        .into();

    let receipt = ledger(&db)
        .like(1, Identity::Anonymous("203.0.113.9".into()))
        .await
        .unwrap();

    assert_eq!(receipt.outcome, LikeOutcome::Unchanged);
    assert!(receipt.liked);
    assert_eq!(receipt.likes_count, 1);

    let log = statements(db);
    assert!(!log.contains("INSERT INTO"));
    assert!(!log.contains("UPDATE \\\"clothing_items\\\""));
}

#[tokio::test]
async fn test_unlike_deletes_and_decrements() {
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![item_row(1, 1)]])
        .append_query_results([vec![item_like::Model {
            id: 3,
            item_id: 1,
            user_id: Some(7),
            ip_address: None,
            created_at: Utc::now(),
        }]])
        .append_exec_results([written(1), written(1)])
        .into_connection()
        .into();

    let receipt = ledger(&db).unlike(1, Identity::User(7)).await.unwrap();

    assert_eq!(receipt.outcome, LikeOutcome::Removed);
    assert!(!receipt.liked);
    assert_eq!(receipt.likes_count, 0);

    let log = statements(db);
    assert!(log.contains("DELETE FROM"));
    assert!(log.contains("\\\"likes_count\\\" + "));
}

#[tokio::test]
async fn test_unlike_without_like_is_unchanged() {
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![item_row(1, 2)]])
        .append_query_results([Vec::<item_like::Model>::new()])
        .into_connection()
        .into();

    let receipt = ledger(&db).unlike(1, Identity::User(7)).await.unwrap();

    assert_eq!(receipt.outcome, LikeOutcome::Unchanged);
    assert!(!receipt.liked);
    assert_eq!(receipt.likes_count, 2);
    assert!(!statements(db).contains("DELETE FROM"));
}

#[tokio::test]
async fn test_like_missing_item_is_not_found() {
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<clothing_item::Model>::new()])
        .into_connection()
        .into();

    let result = ledger(&db).like(404, Identity::User(7)).await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert!(!statements(db).contains("INSERT INTO"));
}

#[tokio::test]
async fn test_like_unlike_round_trip_restores_count() {
    let key = "198.51.100.4";
    let db: Arc<DatabaseConnection> = MockDatabase::new(DatabaseBackend::Postgres)
        // like: item at 0, no like yet
        .append_query_results([vec![item_row(1, 0)]])
        .append_query_results([Vec::<item_like::Model>::new()])
        // like again: item at 1, like present
        .append_query_results([vec![item_row(1, 1)]])
        .append_query_results([vec![anonymous_like(5, 1, key)]])
        // unlike: item at 1, like present
        .append_query_results([vec![item_row(1, 1)]])
        .append_query_results([vec![anonymous_like(5, 1, key)]])
        .append_exec_results([written(1), written(1), written(1), written(1)])
        .into_connection()
        .into();

    let ledger = ledger(&db);
    let identity = Identity::Anonymous(key.into());

    let first = ledger.like(1, identity.clone()).await.unwrap();
    let second = ledger.like(1, identity.clone()).await.unwrap();
    let third = ledger.unlike(1, identity).await.unwrap();

    assert_eq!(
        (first.outcome, first.likes_count),
        (LikeOutcome::Added, 1)
    );
    assert_eq!(
        (second.outcome, second.likes_count),
        (LikeOutcome::Unchanged, 1)
    );
    assert_eq!(
        (third.outcome, third.likes_count),
        (LikeOutcome::Removed, 0)
    );

    drop(ledger);
    assert_eq!(into_log(db).len(), 3);
}
