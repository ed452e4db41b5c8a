use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::db::property as property_db;
use crate::error::ApiError;
use crate::models::PaginationQuery;
use crate::models::media_object::MediaObjectResponse;
use crate::models::property::{CreateProperty, PropertyResponse, UpdateProperty};
use crate::storage::MediaStorage;

/// GET /api/properties — paginated list.
/// Query params: ?page=1&itemsPerPage=10
pub async fn get_properties(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, items_per_page) = query.bounds()?;
    let page = property_db::get_properties_paginated(db.get_ref(), page, items_per_page).await?;

    Ok(HttpResponse::Ok().json(page.map(PropertyResponse::from)))
}

/// GET /api/properties/{id}
pub async fn get_property(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match property_db::find_aggregate(db.get_ref(), id).await? {
        Some(aggregate) => Ok(HttpResponse::Ok().json(PropertyResponse::from(aggregate))),
        None => Err(ApiError::NotFound(format!("Property {id} not found"))),
    }
}

/// POST /api/properties — create a property.
pub async fn create_property(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProperty>,
) -> Result<HttpResponse, ApiError> {
    let aggregate = property_db::insert_property(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(PropertyResponse::from(aggregate)))
}

/// PATCH /api/properties/{id} — partial update.
pub async fn update_property(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateProperty>,
) -> Result<HttpResponse, ApiError> {
    let aggregate =
        property_db::update_property(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PropertyResponse::from(aggregate)))
}

/// DELETE /api/properties/{id} — delete a property with its pictures.
pub async fn delete_property(
    db: web::Data<DatabaseConnection>,
    storage: web::Data<MediaStorage>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let Some(pictures) = property_db::delete_property(db.get_ref(), id).await? else {
        return Err(ApiError::NotFound(format!("Property {id} not found")));
    };

    storage
        .remove_all(pictures.iter().map(|p| p.file_path.as_str()))
        .await;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/properties/{id}/pictures — pictures subresource.
pub async fn get_property_pictures(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match property_db::get_pictures(db.get_ref(), id).await? {
        Some(pictures) => {
            let response: Vec<MediaObjectResponse> =
                pictures.into_iter().map(MediaObjectResponse::from).collect();
            Ok(HttpResponse::Ok().json(response))
        }
        None => Err(ApiError::NotFound(format!("Property {id} not found"))),
    }
}
