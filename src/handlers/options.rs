use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::db::options as options_db;
use crate::error::ApiError;
use crate::models::PaginationQuery;
use crate::models::options::{CreateOptions, OptionsResponse, UpdateOptions};

/// GET /api/options — paginated list.
pub async fn get_options(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    let (page, items_per_page) = query.bounds()?;
    let page = options_db::get_options_paginated(db.get_ref(), page, items_per_page).await?;

    Ok(HttpResponse::Ok().json(page.map(OptionsResponse::from)))
}

/// GET /api/options/{id}
pub async fn get_option(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match options_db::find_aggregate(db.get_ref(), id).await? {
        Some(aggregate) => Ok(HttpResponse::Ok().json(OptionsResponse::from(aggregate))),
        None => Err(ApiError::NotFound(format!("Option {id} not found"))),
    }
}

/// POST /api/options — create an option.
pub async fn create_options(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateOptions>,
) -> Result<HttpResponse, ApiError> {
    let aggregate = options_db::insert_options(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(OptionsResponse::from(aggregate)))
}

/// PATCH /api/options/{id} — partial update.
pub async fn update_options(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateOptions>,
) -> Result<HttpResponse, ApiError> {
    let aggregate =
        options_db::update_options(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OptionsResponse::from(aggregate)))
}

/// DELETE /api/options/{id} — removes the option and its links, never the properties.
pub async fn delete_options(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if options_db::delete_options(db.get_ref(), id).await? {
        tracing::info!("Deleted option {id}");
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound(format!("Option {id} not found")))
    }
}
