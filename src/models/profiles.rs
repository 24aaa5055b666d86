use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `profiles` table.
///
/// A profile is a service offering owned by exactly one user; a user may own
/// several (e.g. a band and a solo act). Contracts reference profiles, not
/// users, as their parties.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub performance_type: String,
    pub description: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    /// JSON array of social-media URL strings.
    pub social_media: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub name: String,
    pub performance_type: String,
    pub description: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub performance_type: Option<String>,
    pub description: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<Vec<String>>,
}
