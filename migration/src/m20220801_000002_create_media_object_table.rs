use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `media_object` table and its columns.
#[derive(DeriveIden)]
enum MediaObject {
    Table,
    Id,
    FilePath,
    MimeType,
    PropertyId,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Property {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaObject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaObject::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaObject::FilePath).string().not_null())
                    .col(ColumnDef::new(MediaObject::MimeType).string().null())
                    .col(ColumnDef::new(MediaObject::PropertyId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_object_property_id")
                            .from(MediaObject::Table, MediaObject::PropertyId)
                            .to(Property::Table, Property::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Pictures are always fetched by owning property
        manager
            .create_index(
                Index::create()
                    .name("idx_media_object_property_id")
                    .table(MediaObject::Table)
                    .col(MediaObject::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaObject::Table).to_owned())
            .await
    }
}
