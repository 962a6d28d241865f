use atlas_database::*;
use std::time::Duration;

const SCHEMA: Migration = Migration::new(
    "inventory",
    "0001-items",
    "DEFINE TABLE IF NOT EXISTS item SCHEMAFULL;
     DEFINE FIELD IF NOT EXISTS label ON item TYPE string;
     DEFINE INDEX IF NOT EXISTS item_label ON item FIELDS label UNIQUE;",
);

async fn memory_db() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .migrations([SCHEMA])
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = memory_db().await;

    db.health().await.expect("health check");
    db.use_ns("test_ns").use_db("test_db").await.expect("session switch");
    assert_eq!(db.query_timeout(), Duration::from_secs(5));
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn zero_query_timeout_fails_validation() {
    let err = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .query_timeout(Duration::ZERO)
        .init()
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn migrations_are_applied_once() {
    let db = memory_db().await;

    let report = db.migrate(&[SCHEMA]).await.expect("second pass");
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, vec!["inventory:0001-items".to_owned()]);

    let next = Migration::new(
        "inventory",
        "0002-note",
        "DEFINE FIELD IF NOT EXISTS note ON item TYPE option<string>;",
    );
    let report = db.migrate(&[SCHEMA, next]).await.expect("third pass");
    assert_eq!(report.applied, vec!["inventory:0002-note".to_owned()]);
}

#[tokio::test]
async fn edited_migration_is_rejected() {
    let db = memory_db().await;

    let edited = Migration::new(SCHEMA.slice, SCHEMA.version, "DEFINE TABLE item SCHEMALESS;");
    let err = db.migrate(&[edited]).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Migration { .. }));
}

#[tokio::test]
async fn unique_index_violation_is_detected() {
    let db = memory_db().await;

    db.bounded("first insert", async {
        db.query("CREATE item SET label = 'a'").await?.check().map_err(surrealdb::Error::from)
    })
    .await
    .expect("first insert");

    let err = db
        .bounded("second insert", async {
            db.query("CREATE item SET label = 'a'").await?.check().map_err(surrealdb::Error::from)
        })
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "unexpected error: {err}");
    assert!(!err.is_write_conflict());
    let message = err.to_string();
    assert!(message.contains("`item_label`"), "index not named: {message}");
    assert!(message.contains("already contains"), "wording changed: {message}");
}

#[tokio::test]
async fn bounded_reports_timeouts() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .query_timeout(Duration::from_millis(20))
        .init()
        .await
        .expect("connect");

    let err = db
        .bounded("slow call", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, surrealdb::Error>(())
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Timeout { .. }));
}
