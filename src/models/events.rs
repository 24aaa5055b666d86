use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `events` table.
///
/// An event belongs to exactly one contract and cascades with it.
/// `duration_minutes` is denormalized from `end_time - start_time` for query
/// convenience and re-derived by the scheduler on every mutation so it can
/// never drift.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contract_id: Uuid,
    pub name: String,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub duration_minutes: i32,
    pub venue: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contracts::Entity",
        from = "Column::ContractId",
        to = "super::contracts::Column::Id"
    )]
    Contract,
    #[sea_orm(has_one = "super::accommodations::Entity")]
    Accommodation,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::accommodations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accommodation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub contract_id: Uuid,
    pub name: String,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub venue: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub venue: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
}
