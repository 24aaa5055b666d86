use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `accommodations` table.
///
/// At most one accommodation per event (unique `event_id`); it has no
/// lifecycle of its own and cascades with the event.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accommodations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub event_id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub address: String,
    pub telephone_number: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Lodging details for an event. Attaching twice overwrites — lodging
/// commonly changes while a tour is being arranged.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachAccommodation {
    pub name: String,
    pub contact_person: Option<String>,
    pub address: String,
    pub telephone_number: String,
}
