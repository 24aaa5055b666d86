use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract lifecycle state stored as a lowercase string in the database.
///
/// Transitions move forward only: `Draft -> PartiallySigned -> Signed ->
/// Completed`, with `Cancelled` reachable from any non-terminal state.
/// `Completed` and `Cancelled` are terminal — nothing owned by the contract
/// may change once either is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "partially_signed")]
    PartiallySigned,
    #[sea_orm(string_value = "signed")]
    Signed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Status {
    /// Terminal states admit no further mutation of the contract or its
    /// events and accommodations.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed | Status::Cancelled)
    }
}

/// SeaORM entity for the `contracts` table.
///
/// `offeror_id` and `offeree_id` reference two distinct profiles. The two
/// signature flags track per-party consent; `version` is bumped on every
/// state-changing write and guards against lost updates from concurrent
/// sign/cancel/complete calls. Contracts are soft-deleted (`deleted_at`) to
/// preserve financial history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub offeror_id: Uuid,
    pub offeree_id: Uuid,
    pub currency_code: String,
    pub upon_signing: i64,
    pub upon_completion: i64,
    pub payment_method: String,
    pub status: Status,
    pub offeror_signed: bool,
    pub offeree_signed: bool,
    pub signed_at: Option<DateTimeUtc>,
    pub version: i32,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::OfferorId",
        to = "super::profiles::Column::Id"
    )]
    Offeror,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::OffereeId",
        to = "super::profiles::Column::Id"
    )]
    Offeree,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Terms supplied when the offeror opens a contract. The offeror profile id
/// comes from the request body and is ownership-checked in the handler; it
/// is not part of the terms themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub name: String,
    pub offeree_id: Uuid,
    pub currency_code: String,
    pub upon_signing: i64,
    pub upon_completion: i64,
    pub payment_method: String,
}

/// Partial update of negotiable terms. Parties cannot be swapped after
/// creation — a different counterparty means a different contract.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContractTerms {
    pub name: Option<String>,
    pub currency_code: Option<String>,
    pub upon_signing: Option<i64>,
    pub upon_completion: Option<i64>,
    pub payment_method: Option<String>,
}
