use sea_orm::*;

use crate::media_upload::PendingMediaObject;
use crate::models::{Page, media_object};

/// Fetch one page of media objects, ordered by id.
pub async fn get_media_objects_paginated(
    db: &DatabaseConnection,
    page: u64,
    items_per_page: u64,
) -> Result<Page<media_object::Model>, DbErr> {
    let paginator = media_object::Entity::find()
        .order_by_asc(media_object::Column::Id)
        .paginate(db, items_per_page);
    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        items,
        total_items,
        page,
        items_per_page,
    })
}

/// Fetch a single media object by ID.
pub async fn get_media_object_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<media_object::Model>, DbErr> {
    media_object::Entity::find_by_id(id).one(db).await
}

/// Persist a media object whose file has already been stored as `file_path`.
pub async fn insert_media_object<F>(
    db: &DatabaseConnection,
    pending: &PendingMediaObject<F>,
    file_path: String,
    mime_type: Option<String>,
) -> Result<media_object::Model, DbErr> {
    let new_media = media_object::ActiveModel {
        id: NotSet,
        file_path: Set(file_path),
        mime_type: Set(mime_type),
        property_id: Set(Some(pending.property.id)),
    };

    new_media.insert(db).await
}

/// Delete a media object by ID, returning the removed row.
pub async fn delete_media_object(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<media_object::Model>, DbErr> {
    let Some(media) = media_object::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    media_object::Entity::delete_by_id(id).exec(db).await?;

    Ok(Some(media))
}
