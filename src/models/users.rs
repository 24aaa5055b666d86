use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `EntityType` enum maps to a Postgres TEXT column stored as lowercase strings.
///
/// It discriminates the two kinds of account on the platform: performers offer
/// their act, producers book it. Profiles owned by either share one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EntityType {
    #[sea_orm(string_value = "performer")]
    Performer,
    #[sea_orm(string_value = "producer")]
    Producer,
}

/// SeaORM entity for the `users` table.
///
/// Users are created on first authenticated request from JWT claims and fill
/// in their legal/fiscal details afterwards, so most fields start out null.
/// Users are never hard-deleted — contracts reference them through their
/// profiles — deactivation is a soft flag.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub entity_type: EntityType,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub vat_id: Option<String>,
    pub bank_account: Option<String>,
    pub auth_provider: String,
    pub is_active: bool,
    pub deactivated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::profiles::Entity")]
    Profiles,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub auth_provider: String,
    pub entity_type: EntityType,
}

/// Used by the `POST /api/auth/complete-profile` endpoint to fill in the
/// legal and fiscal details the identity provider knows nothing about.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfile {
    pub username: Option<String>,
    pub entity_type: Option<EntityType>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub vat_id: Option<String>,
    pub bank_account: Option<String>,
}

/// Used for self-service contact/fiscal updates — identity fields (email,
/// entity type) are immutable once set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub vat_id: Option<String>,
    pub bank_account: Option<String>,
}

/// A safe user representation for API responses (never leaks fiscal fields
/// unintentionally).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub entity_type: EntityType,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub vat_id: Option<String>,
    pub bank_account: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            username: m.username,
            entity_type: m.entity_type,
            name: m.name,
            surname: m.surname,
            phone_number: m.phone_number,
            vat_id: m.vat_id,
            bank_account: m.bank_account,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
