use std::sync::LazyLock;

use regex::Regex;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::iri;
use super::media_object::{self, MediaObjectResponse};
use super::options::{self, OptionsAggregate, OptionsSummary};

/// Postal codes must start with five digits; anything after is free-form.
pub static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}").expect("postal code pattern is valid"));

/// SeaORM entity for the `property` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub surface: i32,
    pub room: i16,
    pub bedroom: i16,
    pub floor: i16,
    pub price: i32,
    pub heat: i16,
    pub city: String,
    pub address: String,
    pub postalcode: String,
    pub sold: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::media_object::Entity")]
    Pictures,
    #[sea_orm(has_many = "super::property_options::Entity")]
    PropertyOptions,
}

impl Related<super::media_object::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pictures.def()
    }
}

impl Related<super::options::Entity> for Entity {
    fn to() -> RelationDef {
        super::property_options::Relation::Options.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::property_options::Relation::Property.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Value for `updated_at` on the next save. Never earlier than the stored one,
/// so a clock stepping backwards cannot make the timestamp regress.
pub fn next_updated_at(previous: DateTimeUtc, now: DateTimeUtc) -> DateTimeUtc {
    now.max(previous)
}

// ── DTOs ──

/// Body of `POST /api/properties`. Every scalar is required; `None` after
/// deserialization is reported as a `required` violation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperty {
    #[validate(required, length(min = 5, max = 100))]
    pub title: Option<String>,
    #[validate(required, length(min = 10, max = 255))]
    pub description: Option<String>,
    #[validate(required, range(min = 20, max = 400))]
    pub surface: Option<i32>,
    #[validate(required, range(min = 1))]
    pub room: Option<i16>,
    #[validate(required, range(min = 1))]
    pub bedroom: Option<i16>,
    #[validate(required, range(min = 0))]
    pub floor: Option<i16>,
    #[validate(required, range(exclusive_min = 0))]
    pub price: Option<i32>,
    #[validate(required, range(exclusive_min = 0))]
    pub heat: Option<i16>,
    #[validate(required, length(min = 2, max = 30))]
    pub city: Option<String>,
    #[validate(required, length(min = 5, max = 255))]
    pub address: Option<String>,
    #[validate(required, length(min = 5, max = 255), regex(path = *POSTAL_CODE))]
    pub postalcode: Option<String>,
    pub sold: Option<bool>,
    /// Options IRIs, e.g. `["/api/options/1"]`.
    pub options: Option<Vec<String>>,
}

/// Body of `PATCH /api/properties/{id}`. Only present fields are validated
/// and written. `createdAt`/`updatedAt` are not writable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    #[validate(length(min = 5, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 20, max = 400))]
    pub surface: Option<i32>,
    #[validate(range(min = 1))]
    pub room: Option<i16>,
    #[validate(range(min = 1))]
    pub bedroom: Option<i16>,
    #[validate(range(min = 0))]
    pub floor: Option<i16>,
    #[validate(range(exclusive_min = 0))]
    pub price: Option<i32>,
    #[validate(range(exclusive_min = 0))]
    pub heat: Option<i16>,
    #[validate(length(min = 2, max = 30))]
    pub city: Option<String>,
    #[validate(length(min = 5, max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 5, max = 255), regex(path = *POSTAL_CODE))]
    pub postalcode: Option<String>,
    pub sold: Option<bool>,
    /// Replaces the whole option set when present.
    pub options: Option<Vec<String>>,
}

// ── Aggregate ──

/// A property together with its options and pictures.
///
/// The relationship mutators keep both sides of each association consistent:
/// the picture's `property_id` and the option's property set move together
/// with this aggregate's collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAggregate {
    pub property: Model,
    pub options: Vec<options::Model>,
    pub pictures: Vec<media_object::Model>,
}

impl PropertyAggregate {
    pub fn new(property: Model) -> Self {
        Self {
            property,
            options: Vec::new(),
            pictures: Vec::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.property.id
    }

    pub fn has_option(&self, option_id: i32) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    pub fn option_ids(&self) -> Vec<i32> {
        self.options.iter().map(|o| o.id).collect()
    }

    /// Add an option to this property and this property to the option.
    pub fn add_option(&mut self, option: &mut OptionsAggregate) {
        if !self.has_option(option.id()) {
            self.options.push(option.option.clone());
        }
        option.properties.insert(self.id());
    }

    /// Remove an option from this property and this property from the option.
    pub fn remove_option(&mut self, option: &mut OptionsAggregate) {
        self.options.retain(|o| o.id != option.id());
        option.properties.remove(&self.id());
    }

    /// Attach a picture, pointing its owning reference at this property.
    pub fn add_picture(&mut self, mut picture: media_object::Model) {
        if self.pictures.iter().any(|p| p.id == picture.id) {
            return;
        }
        picture.property_id = Some(self.id());
        self.pictures.push(picture);
    }

    /// Detach a picture. Its owning reference is cleared only if it still
    /// points at this property.
    pub fn remove_picture(&mut self, picture_id: i32) -> Option<media_object::Model> {
        let index = self.pictures.iter().position(|p| p.id == picture_id)?;
        let mut picture = self.pictures.remove(index);
        if picture.property_id == Some(self.id()) {
            picture.property_id = None;
        }
        Some(picture)
    }
}

/// Representation returned by the property endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    #[serde(rename = "@id")]
    pub iri: String,
    pub id: i32,
    pub title: String,
    pub description: String,
    pub surface: i32,
    pub room: i16,
    pub bedroom: i16,
    pub floor: i16,
    pub price: i32,
    pub heat: i16,
    pub city: String,
    pub address: String,
    pub postalcode: String,
    pub sold: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub options: Vec<OptionsSummary>,
    pub pictures: Vec<MediaObjectResponse>,
}

impl From<PropertyAggregate> for PropertyResponse {
    fn from(a: PropertyAggregate) -> Self {
        let m = a.property;
        Self {
            iri: iri::property(m.id),
            id: m.id,
            title: m.title,
            description: m.description,
            surface: m.surface,
            room: m.room,
            bedroom: m.bedroom,
            floor: m.floor,
            price: m.price,
            heat: m.heat,
            city: m.city,
            address: m.address,
            postalcode: m.postalcode,
            sold: m.sold,
            created_at: m.created_at,
            updated_at: m.updated_at,
            options: a.options.into_iter().map(OptionsSummary::from).collect(),
            pictures: a
                .pictures
                .into_iter()
                .map(MediaObjectResponse::from)
                .collect(),
        }
    }
}
