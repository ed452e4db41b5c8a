//! HTTP-level behaviour: error bodies, pagination parameters, IRIs, and the
//! multipart upload route wired through actix-web with a mocked database.
//!
//! Run with: `cargo test --test api_test`
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test as actix_test;
use actix_web::{App, ResponseError, web};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
use validator::Validate;

use estate_api::db::options as options_db;
use estate_api::error::ApiError;
use estate_api::handlers;
use estate_api::models::property::{self, CreateProperty};
use estate_api::models::{PaginationQuery, iri, media_object};
use estate_api::storage::{MediaStorage, stored_file_name};

const BOUNDARY: &str = "estate-test-boundary";

async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.error_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn multipart_body(property: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(property) = property {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"property\"\r\nContent-Type: text/plain\r\n\r\n{property}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

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

fn temp_media_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("estate-api-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[actix_web::test]
async fn test_bad_request_body() {
    let (status, body) = body_json(ApiError::BadRequest("Property is required".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Property is required");
}

#[actix_web::test]
async fn test_record_not_found_maps_to_404() {
    let err: ApiError = DbErr::RecordNotFound("Property 3 not found".into()).into();
    let (status, body) = body_json(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Property 3 not found");
}

#[actix_web::test]
async fn test_other_db_errors_map_to_500() {
    let err: ApiError = DbErr::Custom("connection reset".into()).into();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_validation_body_lists_violations() {
    let input = CreateProperty {
        title: Some("Loft".into()),
        ..Default::default()
    };
    let err: ApiError = input.validate().unwrap_err().into();
    let (status, body) = body_json(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Validation failed");
    let violations = body["violations"].as_array().unwrap();
    assert!(violations.iter().any(|v| v["propertyPath"] == "title" && v["code"] == "length"));
    assert!(violations.iter().any(|v| v["propertyPath"] == "city" && v["code"] == "required"));
}

#[test]
fn test_pagination_defaults_and_clamping() {
    let q = PaginationQuery::default();
    assert_eq!(q.page(), 1);
    assert_eq!(q.items_per_page(), 10);

    let q = PaginationQuery {
        page: Some(0),
        items_per_page: Some(500),
    };
    assert_eq!(q.page(), 1);
    assert_eq!(q.items_per_page(), 100);

    let q: PaginationQuery =
        serde_json::from_value(serde_json::json!({ "page": 3, "itemsPerPage": 25 })).unwrap();
    assert_eq!(q.page(), 3);
    assert_eq!(q.items_per_page(), 25);
}

#[test]
fn test_pagination_rejects_offset_overflow() {
    let q = PaginationQuery {
        page: Some(u64::MAX),
        items_per_page: Some(100),
    };
    let err = q.bounds().unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let q = PaginationQuery {
        page: Some(u64::MAX),
        items_per_page: Some(1),
    };
    assert_eq!(q.bounds().unwrap(), (u64::MAX, 1));
}

#[actix_web::test]
async fn test_list_route_rejects_huge_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .configure(|cfg| handlers::configure_extractors(cfg, 1024 * 1024))
            .service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = actix_test::TestRequest::get()
        .uri("/api/media_objects?page=18446744073709551615&itemsPerPage=100")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["error"], "Page 18446744073709551615 is out of range");
}

#[test]
fn test_option_iri_must_name_an_option() {
    assert_eq!(iri::parse_in(iri::OPTIONS, "/api/properties/3"), None);
    assert!(matches!(
        options_db::collect_ids(iri::OPTIONS, &["/api/properties/3".to_string()]),
        Err(ApiError::BadRequest(msg)) if msg == "Invalid IRI \"/api/properties/3\"."
    ));

    let ids = options_db::collect_ids(
        iri::OPTIONS,
        &["/api/options/4".to_string(), "4".to_string(), "/api/options/2".to_string()],
    )
    .unwrap();
    assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![2, 4]);
}

#[test]
fn test_iri_round_trip_and_trailing_segment() {
    assert_eq!(iri::property(42), "/api/properties/42");
    assert_eq!(iri::parse_in(iri::PROPERTIES, "/api/properties/42"), Some(42));
    assert_eq!(iri::parse_in(iri::OPTIONS, "https://host/api/options/7"), Some(7));
    assert_eq!(iri::parse_in(iri::OPTIONS, " 12 "), Some(12));
    assert_eq!(iri::parse_in(iri::PROPERTIES, "/api/properties/"), None);
    assert_eq!(iri::trailing_segment("/api/properties/abc"), "abc");
}

#[test]
fn test_media_response_links_property_and_file() {
    let media = media_object::Model {
        id: 3,
        file_path: "a1b2.jpg".into(),
        mime_type: Some("image/jpeg".into()),
        property_id: Some(42),
    };
    let json = serde_json::to_value(media_object::MediaObjectResponse::from(media)).unwrap();

    assert_eq!(json["@id"], "/api/media_objects/3");
    assert_eq!(json["contentUrl"], "/media/a1b2.jpg");
    assert_eq!(json["property"], "/api/properties/42");
}

#[test]
fn test_stored_file_name_keeps_simple_extension() {
    assert!(stored_file_name(Some("Living Room.JPG")).ends_with(".jpg"));
    assert!(!stored_file_name(Some("archive.tar.g$z")).contains('$'));
    assert!(!stored_file_name(None).contains('.'));
}

#[actix_web::test]
async fn test_upload_route_requires_property() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(MediaStorage::new(temp_media_dir())))
            .configure(|cfg| handlers::configure_extractors(cfg, 1024 * 1024))
            .service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/media_objects")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(None, Some(("photo.jpg", b"jpeg-bytes"))))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["error"], "Property is required");
}

#[actix_web::test]
async fn test_upload_route_stores_file_and_returns_media_object() {
    let stored = media_object::Model {
        id: 1,
        file_path: "stored.jpg".into(),
        mime_type: Some("image/jpeg".into()),
        property_id: Some(42),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sunny_loft(42)]])
        .append_query_results([vec![stored]])
        .into_connection();
    let media_dir = temp_media_dir();

    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(MediaStorage::new(media_dir.clone())))
            .configure(|cfg| handlers::configure_extractors(cfg, 1024 * 1024))
            .service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/media_objects")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(
            Some("/api/properties/42"),
            Some(("photo.jpg", b"jpeg-bytes")),
        ))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["property"], "/api/properties/42");

    let files: Vec<_> = std::fs::read_dir(&media_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[actix_web::test]
async fn test_upload_route_treats_unchosen_file_as_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sunny_loft(42)]])
        .into_connection();
    let media_dir = temp_media_dir();

    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(db))
            .app_data(web::Data::new(MediaStorage::new(media_dir.clone())))
            .configure(|cfg| handlers::configure_extractors(cfg, 1024 * 1024))
            .service(web::scope("/api").configure(handlers::init_routes)),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/media_objects")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(Some("/api/properties/42"), Some(("", b""))))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["error"], "\"file\" is required");

    let files: Vec<_> = std::fs::read_dir(&media_dir).unwrap().collect();
    assert!(files.is_empty());
}
