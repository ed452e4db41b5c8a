//! The media-object creation action: property resolution and required
//! fields, against a mocked database.
//!
//! Run with: `cargo test --test media_upload_test`
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use estate_api::error::ApiError;
use estate_api::media_upload::create_media_object;
use estate_api::models::property;

fn sunny_loft(id: i32) -> property::Model {
    let now = Utc::now();
    property::Model {
        id,
        title: "Sunny Loft".to_string(),
        description: "A bright apartment near downtown.".to_string(),
        surface: 60,
        room: 3,
        bedroom: 1,
        floor: 2,
        price: 250000,
        heat: 1,
        city: "Paris".to_string(),
        address: "12 Rue de Something".to_string(),
        postalcode: "75001".to_string(),
        sold: false,
        created_at: now,
        updated_at: now,
    }
}

fn db_with(rows: Vec<property::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([rows])
        .into_connection()
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn bad_request_message(err: ApiError) -> String {
    match err {
        ApiError::BadRequest(msg) => msg,
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_binds_file_to_existing_property() {
    let db = db_with(vec![sunny_loft(42)]);

    let pending = create_media_object(&db, Some("/api/properties/42"), Some("photo.jpg"))
        .await
        .expect("upload should be accepted");

    assert_eq!(pending.property.id, 42);
    assert_eq!(pending.file, "photo.jpg");
}

#[tokio::test]
async fn test_accepts_bare_id() {
    let db = db_with(vec![sunny_loft(7)]);

    let pending = create_media_object(&db, Some("7"), Some(()))
        .await
        .unwrap();

    assert_eq!(pending.property.id, 7);
}

#[tokio::test]
async fn test_missing_property_is_rejected() {
    let db = empty_db();

    let err = create_media_object(&db, None, Some("photo.jpg"))
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "Property is required");
}

#[tokio::test]
async fn test_blank_property_is_rejected() {
    let db = empty_db();

    let err = create_media_object(&db, Some("  "), Some("photo.jpg"))
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "Property is required");
}

#[tokio::test]
async fn test_unknown_property_is_not_valid() {
    let db = db_with(Vec::new());

    let err = create_media_object(&db, Some("/api/properties/404"), Some("photo.jpg"))
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "ID 404 is not a valid Property");
}

#[tokio::test]
async fn test_non_numeric_id_is_not_valid() {
    let db = empty_db();

    let err = create_media_object(&db, Some("/api/properties/abc"), Some("photo.jpg"))
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "ID abc is not a valid Property");
}

#[tokio::test]
async fn test_missing_file_is_rejected() {
    let db = db_with(vec![sunny_loft(42)]);

    let err = create_media_object::<_, &str>(&db, Some("/api/properties/42"), None)
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "\"file\" is required");
}

#[tokio::test]
async fn test_property_is_checked_before_file() {
    let db = db_with(Vec::new());

    let err = create_media_object::<_, &str>(&db, Some("/api/properties/1"), None)
        .await
        .unwrap_err();

    assert_eq!(bad_request_message(err), "ID 1 is not a valid Property");
}
