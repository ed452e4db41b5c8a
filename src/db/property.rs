use std::collections::{BTreeSet, HashMap};

use sea_orm::*;
use validator::Validate;

use crate::db::options as options_db;
use crate::db::property_options;
use crate::error::{ApiError, required, unique_violation, validation_errors};
use crate::models::options::OptionsAggregate;
use crate::models::property::{
    self, CreateProperty, PropertyAggregate, UpdateProperty, next_updated_at,
};
use crate::models::{Page, media_object, options};

/// Attach options and pictures to a batch of properties in three queries.
pub async fn load_aggregates<C: ConnectionTrait>(
    db: &C,
    properties: Vec<property::Model>,
) -> Result<Vec<PropertyAggregate>, DbErr> {
    if properties.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = properties.iter().map(|p| p.id).collect();

    let pictures = media_object::Entity::find()
        .filter(media_object::Column::PropertyId.is_in(ids.clone()))
        .order_by_asc(media_object::Column::Id)
        .all(db)
        .await?;

    let links = crate::models::property_options::Entity::find()
        .filter(crate::models::property_options::Column::PropertyId.is_in(ids))
        .all(db)
        .await?;

    let option_ids: BTreeSet<i32> = links.iter().map(|l| l.options_id).collect();
    let options_by_id: HashMap<i32, options::Model> = if option_ids.is_empty() {
        HashMap::new()
    } else {
        options::Entity::find()
            .filter(options::Column::Id.is_in(option_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect()
    };

    let mut aggregates: Vec<PropertyAggregate> =
        properties.into_iter().map(PropertyAggregate::new).collect();
    for aggregate in &mut aggregates {
        let id = aggregate.id();
        for picture in pictures.iter().filter(|p| p.property_id == Some(id)) {
            aggregate.add_picture(picture.clone());
        }
        for link in links.iter().filter(|l| l.property_id == id) {
            if let Some(option) = options_by_id.get(&link.options_id) {
                aggregate.options.push(option.clone());
            }
        }
        aggregate.options.sort_by_key(|o| o.id);
    }

    Ok(aggregates)
}

/// Fetch a single property with its options and pictures.
pub async fn find_aggregate<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<PropertyAggregate>, DbErr> {
    let Some(property) = property::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    Ok(load_aggregates(db, vec![property]).await?.pop())
}

/// Fetch one page of properties, ordered by id.
pub async fn get_properties_paginated(
    db: &DatabaseConnection,
    page: u64,
    items_per_page: u64,
) -> Result<Page<PropertyAggregate>, DbErr> {
    let paginator = property::Entity::find()
        .order_by_asc(property::Column::Id)
        .paginate(db, items_per_page);
    let total_items = paginator.num_items().await?;
    let models = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        items: load_aggregates(db, models).await?,
        total_items,
        page,
        items_per_page,
    })
}

/// Pictures of a property, or `None` if the property does not exist.
pub async fn get_pictures(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<Vec<media_object::Model>>, DbErr> {
    if property::Entity::find_by_id(id).one(db).await?.is_none() {
        return Ok(None);
    }

    let pictures = media_object::Entity::find()
        .filter(media_object::Column::PropertyId.eq(id))
        .order_by_asc(media_object::Column::Id)
        .all(db)
        .await?;
    Ok(Some(pictures))
}

/// Whether another property already uses `title`.
pub async fn title_taken<C: ConnectionTrait>(
    db: &C,
    title: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = property::Entity::find().filter(property::Column::Title.eq(title));
    if let Some(id) = exclude_id {
        query = query.filter(property::Column::Id.ne(id));
    }

    Ok(query.count(db).await? > 0)
}

/// Replace the option set of a property from the property side, then write
/// the join rows.
async fn apply_option_iris<C: ConnectionTrait>(
    db: &C,
    aggregate: &mut PropertyAggregate,
    iris: &[String],
) -> Result<(), ApiError> {
    let wanted = options_db::resolve_iris(db, iris).await?;
    let wanted_ids: BTreeSet<i32> = wanted.iter().map(|o| o.id).collect();

    let stale: Vec<options::Model> = aggregate
        .options
        .iter()
        .filter(|o| !wanted_ids.contains(&o.id))
        .cloned()
        .collect();
    for option in stale {
        aggregate.remove_option(&mut OptionsAggregate::new(option));
    }
    for option in wanted {
        aggregate.add_option(&mut OptionsAggregate::new(option));
    }
    aggregate.options.sort_by_key(|o| o.id);

    let ids: BTreeSet<i32> = aggregate.option_ids().into_iter().collect();
    property_options::sync_for_property(db, aggregate.id(), &ids).await?;
    Ok(())
}

/// Active model for a new property. `created_at` and `updated_at` are both
/// stamped with `now`.
pub fn build_property(
    input: CreateProperty,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<property::ActiveModel, ApiError> {
    Ok(property::ActiveModel {
        id: NotSet,
        title: Set(required(input.title, "title")?),
        description: Set(required(input.description, "description")?),
        surface: Set(required(input.surface, "surface")?),
        room: Set(required(input.room, "room")?),
        bedroom: Set(required(input.bedroom, "bedroom")?),
        floor: Set(required(input.floor, "floor")?),
        price: Set(required(input.price, "price")?),
        heat: Set(required(input.heat, "heat")?),
        city: Set(required(input.city, "city")?),
        address: Set(required(input.address, "address")?),
        postalcode: Set(required(input.postalcode, "postalcode")?),
        sold: Set(input.sold.unwrap_or(false)),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

/// Validate and insert a new property.
pub async fn insert_property(
    db: &DatabaseConnection,
    mut input: CreateProperty,
) -> Result<PropertyAggregate, ApiError> {
    let mut errors = validation_errors(input.validate());
    if let Some(title) = &input.title {
        if title_taken(db, title, None).await? {
            errors.add("title", unique_violation());
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let option_iris = input.options.take();
    let new_property = build_property(input, chrono::Utc::now())?;

    let txn = db.begin().await?;
    let mut aggregate = PropertyAggregate::new(new_property.insert(&txn).await?);
    if let Some(iris) = option_iris {
        apply_option_iris(&txn, &mut aggregate, &iris).await?;
    }
    txn.commit().await?;

    tracing::info!(
        "Created property {} ({})",
        aggregate.id(),
        aggregate.property.title
    );
    Ok(aggregate)
}

/// Apply a partial update. `updated_at` is refreshed on every call;
/// `created_at` is never written.
pub async fn update_property(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateProperty,
) -> Result<PropertyAggregate, ApiError> {
    let mut errors = validation_errors(input.validate());

    let txn = db.begin().await?;
    let mut aggregate = find_aggregate(&txn, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Property {id} not found")))?;

    if let Some(title) = &input.title {
        if title_taken(&txn, title, Some(id)).await? {
            errors.add("title", unique_violation());
        }
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let previous = aggregate.property.updated_at;
    let mut active: property::ActiveModel = aggregate.property.clone().into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(surface) = input.surface {
        active.surface = Set(surface);
    }
    if let Some(room) = input.room {
        active.room = Set(room);
    }
    if let Some(bedroom) = input.bedroom {
        active.bedroom = Set(bedroom);
    }
    if let Some(floor) = input.floor {
        active.floor = Set(floor);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(heat) = input.heat {
        active.heat = Set(heat);
    }
    if let Some(city) = input.city {
        active.city = Set(city);
    }
    if let Some(address) = input.address {
        active.address = Set(address);
    }
    if let Some(postalcode) = input.postalcode {
        active.postalcode = Set(postalcode);
    }
    if let Some(sold) = input.sold {
        active.sold = Set(sold);
    }
    active.updated_at = Set(next_updated_at(previous, chrono::Utc::now()));

    aggregate.property = active.update(&txn).await?;
    if let Some(iris) = input.options {
        apply_option_iris(&txn, &mut aggregate, &iris).await?;
    }
    txn.commit().await?;

    Ok(aggregate)
}

/// Delete a property, its pictures and its join rows in one transaction.
///
/// Returns the removed pictures so their files can be cleaned up, or `None`
/// when no such property exists.
pub async fn delete_property(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<Vec<media_object::Model>>, DbErr> {
    let txn = db.begin().await?;
    let Some(mut aggregate) = find_aggregate(&txn, id).await? else {
        return Ok(None);
    };

    let picture_ids: Vec<i32> = aggregate.pictures.iter().map(|p| p.id).collect();
    let removed: Vec<media_object::Model> = picture_ids
        .into_iter()
        .filter_map(|picture_id| aggregate.remove_picture(picture_id))
        .collect();

    media_object::Entity::delete_many()
        .filter(media_object::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    crate::models::property_options::Entity::delete_many()
        .filter(crate::models::property_options::Column::PropertyId.eq(id))
        .exec(&txn)
        .await?;
    property::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("Deleted property {id} with {} picture(s)", removed.len());
    Ok(Some(removed))
}
