pub mod media_objects;
pub mod options;
pub mod properties;

use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::error::ApiError;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Property routes ──
    cfg.service(
        web::scope("/properties")
            .route("", web::get().to(properties::get_properties))
            .route("", web::post().to(properties::create_property))
            .route("/{id}", web::get().to(properties::get_property))
            .route("/{id}", web::patch().to(properties::update_property))
            .route("/{id}", web::delete().to(properties::delete_property))
            .route("/{id}/pictures", web::get().to(properties::get_property_pictures)),
    );

    // ── Options routes ──
    cfg.service(
        web::scope("/options")
            .route("", web::get().to(options::get_options))
            .route("", web::post().to(options::create_options))
            .route("/{id}", web::get().to(options::get_option))
            .route("/{id}", web::patch().to(options::update_options))
            .route("/{id}", web::delete().to(options::delete_options)),
    );

    // ── Media object routes (upload is multipart) ──
    cfg.service(
        web::scope("/media_objects")
            .route("", web::get().to(media_objects::get_media_objects))
            .route("", web::post().to(media_objects::create_media_object))
            .route("/{id}", web::get().to(media_objects::get_media_object))
            .route("/{id}", web::delete().to(media_objects::delete_media_object)),
    );
}

/// Extractor configs that turn malformed input into `ApiError::BadRequest`
/// so every error body has the same shape.
pub fn configure_extractors(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::NotFound(err.to_string()).into()),
    )
    .app_data(
        MultipartFormConfig::default()
            .total_limit(max_upload_bytes)
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );
}
