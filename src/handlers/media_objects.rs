use actix_multipart::form::MultipartForm;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::db::media_object as media_db;
use crate::error::ApiError;
use crate::media_upload;
use crate::models::PaginationQuery;
use crate::models::media_object::MediaObjectResponse;
use crate::storage::MediaStorage;

/// Multipart body of `POST /api/media_objects`. Both fields are optional at
/// the extractor level so that their absence is reported by the action.
#[derive(MultipartForm)]
pub struct MediaUploadForm {
    pub property: Option<Text<String>>,
    pub file: Option<TempFile>,
}

/// A `file` part with no file name and no bytes is what a browser sends when
/// nothing was chosen; treat it as absent.
pub fn chosen_file(file: Option<TempFile>) -> Option<TempFile> {
    file.filter(|f| f.size > 0 || f.file_name.as_deref().is_some_and(|name| !name.is_empty()))
}

/// GET /api/media_objects — paginated list.
pub async fn get_media_objects(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, items_per_page) = query.bounds()?;
    let page = media_db::get_media_objects_paginated(db.get_ref(), page, items_per_page).await?;

    Ok(HttpResponse::Ok().json(page.map(MediaObjectResponse::from)))
}

/// GET /api/media_objects/{id}
pub async fn get_media_object(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match media_db::get_media_object_by_id(db.get_ref(), id).await? {
        Some(media) => Ok(HttpResponse::Ok().json(MediaObjectResponse::from(media))),
        None => Err(ApiError::NotFound(format!("Media object {id} not found"))),
    }
}

/// POST /api/media_objects — upload a picture for a property.
///
/// Form fields: `property` (IRI such as `/api/properties/42`) and `file`.
pub async fn create_media_object(
    db: web::Data<DatabaseConnection>,
    storage: web::Data<MediaStorage>,
    MultipartForm(form): MultipartForm<MediaUploadForm>,
) -> Result<HttpResponse, ApiError> {
    let property_iri = form.property.map(|t| t.0);
    let pending = media_upload::create_media_object(
        db.get_ref(),
        property_iri.as_deref(),
        chosen_file(form.file),
    )
    .await?;

    let mime_type = pending.file.content_type.as_ref().map(|m| m.to_string());
    let file_path = storage
        .persist(pending.file.file.path(), pending.file.file_name.as_deref())
        .await?;

    match media_db::insert_media_object(db.get_ref(), &pending, file_path.clone(), mime_type).await
    {
        Ok(media) => {
            tracing::info!(
                "Stored media object {} for property {}",
                media.id,
                pending.property.id
            );
            Ok(HttpResponse::Created().json(MediaObjectResponse::from(media)))
        }
        Err(e) => {
            storage.remove_all([file_path.as_str()]).await;
            Err(e.into())
        }
    }
}

/// DELETE /api/media_objects/{id} — delete the row and its stored file.
pub async fn delete_media_object(
    db: web::Data<DatabaseConnection>,
    storage: web::Data<MediaStorage>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let Some(media) = media_db::delete_media_object(db.get_ref(), id).await? else {
        return Err(ApiError::NotFound(format!("Media object {id} not found")));
    };

    storage.remove_all([media.file_path.as_str()]).await;
    Ok(HttpResponse::NoContent().finish())
}
