use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `options` table and its columns.
#[derive(DeriveIden)]
enum Options {
    Table,
    Id,
    Name,
}

/// Identifiers for the `property_options` join table.
#[derive(DeriveIden)]
enum PropertyOptions {
    Table,
    PropertyId,
    OptionsId,
}

#[derive(DeriveIden)]
enum Property {
    Table,
    Id,
}

const FK_PROPERTY: &str = "fk_property_options_property_id";
const FK_OPTIONS: &str = "fk_property_options_options_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Options::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Options::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Options::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PropertyOptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PropertyOptions::PropertyId).integer().not_null())
                    .col(ColumnDef::new(PropertyOptions::OptionsId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PropertyOptions::PropertyId)
                            .col(PropertyOptions::OptionsId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_PROPERTY)
                            .from(PropertyOptions::Table, PropertyOptions::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_OPTIONS)
                            .from(PropertyOptions::Table, PropertyOptions::OptionsId)
                            .to(Options::Table, Options::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_property_options_property_id")
                    .table(PropertyOptions::Table)
                    .col(PropertyOptions::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_property_options_options_id")
                    .table(PropertyOptions::Table)
                    .col(PropertyOptions::OptionsId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PROPERTY)
                    .table(PropertyOptions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OPTIONS)
                    .table(PropertyOptions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Options::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyOptions::Table).to_owned())
            .await?;

        Ok(())
    }
}
