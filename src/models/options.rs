use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::iri;
use super::property::PropertyAggregate;

/// SeaORM entity for the `options` table (amenities such as "Balcony").
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::property_options::Entity")]
    PropertyOptions,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        super::property_options::Relation::Property.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::property_options::Relation::Options.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateOptions {
    #[validate(required, length(min = 2, max = 30))]
    pub name: Option<String>,
    /// Property IRIs this option applies to.
    pub properties: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOptions {
    #[validate(length(min = 2, max = 30))]
    pub name: Option<String>,
    /// Replaces the option's property set when present.
    pub properties: Option<Vec<String>>,
}

// ── Aggregate ──

/// An option with the ids of the properties that carry it.
///
/// Membership changes go through [`PropertyAggregate`] so that both sides are
/// updated in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsAggregate {
    pub option: Model,
    pub properties: BTreeSet<i32>,
}

impl OptionsAggregate {
    pub fn new(option: Model) -> Self {
        Self {
            option,
            properties: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.option.id
    }

    pub fn add_property(&mut self, property: &mut PropertyAggregate) {
        property.add_option(self);
    }

    pub fn remove_property(&mut self, property: &mut PropertyAggregate) {
        property.remove_option(self);
    }
}

/// Option as embedded in a property representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionsSummary {
    pub id: i32,
    pub name: String,
}

impl From<Model> for OptionsSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

/// Representation returned by the options endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    #[serde(rename = "@id")]
    pub iri: String,
    pub id: i32,
    pub name: String,
    pub properties: Vec<String>,
}

impl From<OptionsAggregate> for OptionsResponse {
    fn from(a: OptionsAggregate) -> Self {
        Self {
            iri: iri::options(a.option.id),
            id: a.option.id,
            name: a.option.name,
            properties: a.properties.into_iter().map(iri::property).collect(),
        }
    }
}
