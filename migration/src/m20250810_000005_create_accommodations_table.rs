use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `accommodations` table and its columns.
#[derive(DeriveIden)]
enum Accommodations {
    Table,
    Id,
    EventId,
    Name,
    ContactPerson,
    Address,
    TelephoneNumber,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accommodations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accommodations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One accommodation per event, enforced at the schema level.
                    .col(
                        ColumnDef::new(Accommodations::EventId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accommodations::Name).string().not_null())
                    .col(ColumnDef::new(Accommodations::ContactPerson).string())
                    .col(ColumnDef::new(Accommodations::Address).string().not_null())
                    .col(
                        ColumnDef::new(Accommodations::TelephoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accommodations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accommodations::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accommodations_event_id")
                            .from(Accommodations::Table, Accommodations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accommodations::Table).to_owned())
            .await
    }
}
