pub use sea_orm_migration::prelude::*;

mod m20220801_000001_create_property_table;
mod m20220801_000002_create_media_object_table;
mod m20220816_080559_create_options_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220801_000001_create_property_table::Migration),
            Box::new(m20220801_000002_create_media_object_table::Migration),
            Box::new(m20220816_080559_create_options_tables::Migration),
        ]
    }
}
