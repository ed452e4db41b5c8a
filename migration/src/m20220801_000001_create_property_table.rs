use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `property` table and its columns.
#[derive(DeriveIden)]
enum Property {
    Table,
    Id,
    Title,
    Description,
    Surface,
    Room,
    Bedroom,
    Floor,
    Price,
    Heat,
    City,
    Address,
    Postalcode,
    Sold,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Property::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Property::Title)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Property::Description).text().not_null())
                    .col(ColumnDef::new(Property::Surface).integer().not_null())
                    .col(ColumnDef::new(Property::Room).small_integer().not_null())
                    .col(ColumnDef::new(Property::Bedroom).small_integer().not_null())
                    .col(ColumnDef::new(Property::Floor).small_integer().not_null())
                    .col(ColumnDef::new(Property::Price).integer().not_null())
                    .col(ColumnDef::new(Property::Heat).small_integer().not_null())
                    .col(ColumnDef::new(Property::City).string().not_null())
                    .col(ColumnDef::new(Property::Address).string().not_null())
                    .col(ColumnDef::new(Property::Postalcode).string().not_null())
                    .col(
                        ColumnDef::new(Property::Sold)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Property::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Property::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Property::Table).to_owned())
            .await
    }
}
