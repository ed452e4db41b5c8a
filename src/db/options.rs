use std::collections::BTreeSet;

use sea_orm::*;
use validator::Validate;

use crate::db::property_options;
use crate::error::{ApiError, required, unique_violation, validation_errors};
use crate::models::iri;
use crate::models::options::{self, CreateOptions, OptionsAggregate, UpdateOptions};
use crate::models::property::{self, PropertyAggregate};
use crate::models::Page;

/// Fetch an option together with the ids of its properties.
pub async fn find_aggregate<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<OptionsAggregate>, DbErr> {
    let Some(option) = options::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut aggregate = OptionsAggregate::new(option);
    aggregate.properties = property_options::property_ids_for_option(db, id).await?;
    Ok(Some(aggregate))
}

/// Fetch one page of options, ordered by id.
pub async fn get_options_paginated(
    db: &DatabaseConnection,
    page: u64,
    items_per_page: u64,
) -> Result<Page<OptionsAggregate>, DbErr> {
    let paginator = options::Entity::find()
        .order_by_asc(options::Column::Id)
        .paginate(db, items_per_page);
    let total_items = paginator.num_items().await?;
    let models = paginator.fetch_page(page - 1).await?;

    let ids: Vec<i32> = models.iter().map(|o| o.id).collect();
    let mut links = property_options::property_ids_for_options(db, ids).await?;
    let items = models
        .into_iter()
        .map(|option| {
            let mut aggregate = OptionsAggregate::new(option);
            aggregate.properties = links.remove(&aggregate.id()).unwrap_or_default();
            aggregate
        })
        .collect();

    Ok(Page {
        items,
        total_items,
        page,
        items_per_page,
    })
}

/// Whether another option already uses `name`.
pub async fn name_taken<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = options::Entity::find().filter(options::Column::Name.eq(name));
    if let Some(id) = exclude_id {
        query = query.filter(options::Column::Id.ne(id));
    }

    Ok(query.count(db).await? > 0)
}

/// Collect the distinct ids named by `iris`, all of which must point into
/// `collection`.
pub fn collect_ids(collection: &str, iris: &[String]) -> Result<BTreeSet<i32>, ApiError> {
    iris.iter()
        .map(|value| {
            iri::parse_in(collection, value)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid IRI \"{value}\".")))
        })
        .collect()
}

/// First requested id that has no row, reported as a client error.
fn ensure_found(
    wanted: &BTreeSet<i32>,
    found: impl IntoIterator<Item = i32>,
    to_iri: fn(i32) -> String,
) -> Result<(), ApiError> {
    let found: BTreeSet<i32> = found.into_iter().collect();
    match wanted.difference(&found).next() {
        Some(missing) => Err(ApiError::BadRequest(format!(
            "Item not found for \"{}\".",
            to_iri(*missing)
        ))),
        None => Ok(()),
    }
}

/// Resolve option IRIs to rows. Duplicates collapse; an IRI that does not
/// name an existing option is a client error.
pub async fn resolve_iris<C: ConnectionTrait>(
    db: &C,
    iris: &[String],
) -> Result<Vec<options::Model>, ApiError> {
    let ids = collect_ids(iri::OPTIONS, iris)?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found = options::Entity::find()
        .filter(options::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(options::Column::Id)
        .all(db)
        .await?;
    ensure_found(&ids, found.iter().map(|o| o.id), iri::options)?;

    Ok(found)
}

/// Resolve property IRIs to rows, with the same rules as [`resolve_iris`].
async fn resolve_property_iris<C: ConnectionTrait>(
    db: &C,
    iris: &[String],
) -> Result<Vec<property::Model>, ApiError> {
    let ids = collect_ids(iri::PROPERTIES, iris)?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found = property::Entity::find()
        .filter(property::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    ensure_found(&ids, found.iter().map(|p| p.id), iri::property)?;

    Ok(found)
}

/// Replace the property membership of an option from the option side, then
/// write the join rows.
async fn apply_property_iris<C: ConnectionTrait>(
    db: &C,
    aggregate: &mut OptionsAggregate,
    iris: &[String],
) -> Result<(), ApiError> {
    let wanted = resolve_property_iris(db, iris).await?;
    let wanted_ids: BTreeSet<i32> = wanted.iter().map(|p| p.id).collect();

    let stale: Vec<i32> = aggregate
        .properties
        .difference(&wanted_ids)
        .copied()
        .collect();
    if !stale.is_empty() {
        let stale_properties = property::Entity::find()
            .filter(property::Column::Id.is_in(stale))
            .all(db)
            .await?;
        for model in stale_properties {
            aggregate.remove_property(&mut PropertyAggregate::new(model));
        }
    }
    for model in wanted {
        aggregate.add_property(&mut PropertyAggregate::new(model));
    }

    property_options::sync_for_option(db, aggregate.id(), &aggregate.properties).await?;
    Ok(())
}

/// Validate and insert a new option.
pub async fn insert_options(
    db: &DatabaseConnection,
    input: CreateOptions,
) -> Result<OptionsAggregate, ApiError> {
    let mut errors = validation_errors(input.validate());
    if let Some(name) = &input.name {
        if name_taken(db, name, None).await? {
            errors.add("name", unique_violation());
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let txn = db.begin().await?;
    let new_option = options::ActiveModel {
        id: NotSet,
        name: Set(required(input.name, "name")?),
    };
    let mut aggregate = OptionsAggregate::new(new_option.insert(&txn).await?);

    if let Some(iris) = input.properties {
        apply_property_iris(&txn, &mut aggregate, &iris).await?;
    }
    txn.commit().await?;

    tracing::info!("Created option {} ({})", aggregate.id(), aggregate.option.name);
    Ok(aggregate)
}

/// Apply a partial update to an option.
pub async fn update_options(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateOptions,
) -> Result<OptionsAggregate, ApiError> {
    let mut errors = validation_errors(input.validate());

    let txn = db.begin().await?;
    let mut aggregate = find_aggregate(&txn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Option {id} not found")))?;

    if let Some(name) = &input.name {
        if name_taken(&txn, name, Some(id)).await? {
            errors.add("name", unique_violation());
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    if let Some(name) = input.name {
        let mut active: options::ActiveModel = aggregate.option.clone().into();
        active.name = Set(name);
        aggregate.option = active.update(&txn).await?;
    }
    if let Some(iris) = input.properties {
        apply_property_iris(&txn, &mut aggregate, &iris).await?;
    }
    txn.commit().await?;

    Ok(aggregate)
}

/// Delete an option and its join rows. Properties are left untouched.
/// Returns `false` when no such option exists.
pub async fn delete_options(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let txn = db.begin().await?;
    crate::models::property_options::Entity::delete_many()
        .filter(crate::models::property_options::Column::OptionsId.eq(id))
        .exec(&txn)
        .await?;
    let result = options::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(result.rows_affected > 0)
}
