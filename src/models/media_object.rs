use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::iri;
use crate::storage::MEDIA_ROUTE;

/// SeaORM entity for the `media_object` table: one stored upload.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_object")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// File name relative to the media directory.
    pub file_path: String,
    pub mime_type: Option<String>,
    pub property_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Public URL of a stored file.
pub fn content_url(file_path: &str) -> String {
    format!("{MEDIA_ROUTE}/{file_path}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObjectResponse {
    #[serde(rename = "@id")]
    pub iri: String,
    pub id: i32,
    pub content_url: String,
    pub mime_type: Option<String>,
    pub property: Option<String>,
}

impl From<Model> for MediaObjectResponse {
    fn from(m: Model) -> Self {
        Self {
            iri: iri::media_object(m.id),
            id: m.id,
            content_url: content_url(&m.file_path),
            mime_type: m.mime_type,
            property: m.property_id.map(iri::property),
        }
    }
}
