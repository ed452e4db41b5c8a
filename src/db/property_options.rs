use std::collections::{BTreeSet, HashMap};

use sea_orm::*;

use crate::models::property_options;

/// Option ids currently linked to a property.
pub async fn option_ids_for_property<C: ConnectionTrait>(
    db: &C,
    property_id: i32,
) -> Result<BTreeSet<i32>, DbErr> {
    let rows = property_options::Entity::find()
        .filter(property_options::Column::PropertyId.eq(property_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| r.options_id).collect())
}

/// Property ids currently linked to an option.
pub async fn property_ids_for_option<C: ConnectionTrait>(
    db: &C,
    options_id: i32,
) -> Result<BTreeSet<i32>, DbErr> {
    let rows = property_options::Entity::find()
        .filter(property_options::Column::OptionsId.eq(options_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| r.property_id).collect())
}

/// Property ids for a batch of options in one query, keyed by option id.
/// Options without links are absent from the map.
pub async fn property_ids_for_options<C: ConnectionTrait>(
    db: &C,
    options_ids: Vec<i32>,
) -> Result<HashMap<i32, BTreeSet<i32>>, DbErr> {
    if options_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = property_options::Entity::find()
        .filter(property_options::Column::OptionsId.is_in(options_ids))
        .all(db)
        .await?;

    let mut by_option: HashMap<i32, BTreeSet<i32>> = HashMap::new();
    for row in rows {
        by_option
            .entry(row.options_id)
            .or_default()
            .insert(row.property_id);
    }
    Ok(by_option)
}

/// Make the join rows of one property match `wanted`, touching only the
/// rows that differ.
pub async fn sync_for_property<C: ConnectionTrait>(
    db: &C,
    property_id: i32,
    wanted: &BTreeSet<i32>,
) -> Result<(), DbErr> {
    let current = option_ids_for_property(db, property_id).await?;

    let removed: Vec<i32> = current.difference(wanted).copied().collect();
    if !removed.is_empty() {
        property_options::Entity::delete_many()
            .filter(property_options::Column::PropertyId.eq(property_id))
            .filter(property_options::Column::OptionsId.is_in(removed))
            .exec(db)
            .await?;
    }

    let added: Vec<property_options::ActiveModel> = wanted
        .difference(&current)
        .map(|&options_id| property_options::ActiveModel {
            property_id: Set(property_id),
            options_id: Set(options_id),
        })
        .collect();
    if !added.is_empty() {
        property_options::Entity::insert_many(added)
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}

/// Make the join rows of one option match `wanted`.
pub async fn sync_for_option<C: ConnectionTrait>(
    db: &C,
    options_id: i32,
    wanted: &BTreeSet<i32>,
) -> Result<(), DbErr> {
    let current = property_ids_for_option(db, options_id).await?;

    let removed: Vec<i32> = current.difference(wanted).copied().collect();
    if !removed.is_empty() {
        property_options::Entity::delete_many()
            .filter(property_options::Column::OptionsId.eq(options_id))
            .filter(property_options::Column::PropertyId.is_in(removed))
            .exec(db)
            .await?;
    }

    let added: Vec<property_options::ActiveModel> = wanted
        .difference(&current)
        .map(|&property_id| property_options::ActiveModel {
            property_id: Set(property_id),
            options_id: Set(options_id),
        })
        .collect();
    if !added.is_empty() {
        property_options::Entity::insert_many(added)
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}
