//! Creation of a media object from an upload form.
//!
//! The form carries a `property` IRI and a `file`. This module only resolves
//! and binds them; storing the file and inserting the row is left to the
//! caller.

use sea_orm::{ConnectionTrait, EntityTrait};

use crate::error::ApiError;
use crate::models::{iri, property};

/// A media object bound to its property and file, not yet persisted.
#[derive(Debug)]
pub struct PendingMediaObject<F> {
    pub property: property::Model,
    pub file: F,
}

/// Resolve the owning property and bind the uploaded file to it.
///
/// Checks run in order: `property` present, `property` names an existing
/// property, `file` present.
pub async fn create_media_object<C, F>(
    db: &C,
    property_iri: Option<&str>,
    file: Option<F>,
) -> Result<PendingMediaObject<F>, ApiError>
where
    C: ConnectionTrait,
{
    let property_iri = property_iri
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Property is required".to_string()))?;

    let segment = iri::trailing_segment(property_iri);
    let not_valid = || ApiError::BadRequest(format!("ID {segment} is not a valid Property"));

    let id: i32 = segment.parse().map_err(|_| not_valid())?;
    let property = property::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(not_valid)?;

    let file = file.ok_or_else(|| ApiError::BadRequest("\"file\" is required".to_string()))?;

    Ok(PendingMediaObject { property, file })
}
