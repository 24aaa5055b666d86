use sea_orm::entity::prelude::Json;
use sea_orm::*;
use uuid::Uuid;

use crate::models::profiles::{self, CreateProfile, UpdateProfile};

fn social_media_json(urls: Option<Vec<String>>) -> Option<Json> {
    urls.map(|list| Json::Array(list.into_iter().map(Json::String).collect()))
}

/// Insert a new profile owned by `user_id`.
pub async fn insert_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: CreateProfile,
) -> Result<profiles::Model, DbErr> {
    let new_profile = profiles::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(input.name),
        performance_type: Set(input.performance_type),
        description: Set(input.description),
        bio: Set(input.bio),
        website: Set(input.website),
        social_media: Set(social_media_json(input.social_media)),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_profile.insert(db).await
}

/// Fetch all profiles.
pub async fn get_all_profiles(db: &DatabaseConnection) -> Result<Vec<profiles::Model>, DbErr> {
    profiles::Entity::find().all(db).await
}

/// Fetch a single profile by ID.
pub async fn get_profile_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(db).await
}

/// Fetch all profiles owned by a user.
pub async fn get_profiles_by_user_id(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<profiles::Model>, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .all(db)
        .await
}

/// IDs of all profiles owned by a user (for party lookups on contracts).
pub async fn get_profile_ids_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    Ok(profiles::Entity::find()
        .filter(profiles::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect())
}

/// Check whether a profile belongs to a user.
pub async fn profile_owned_by(
    db: &DatabaseConnection,
    profile_id: Uuid,
    user_id: Uuid,
) -> Result<bool, DbErr> {
    Ok(profiles::Entity::find_by_id(profile_id)
        .one(db)
        .await?
        .map(|p| p.user_id == user_id)
        .unwrap_or(false))
}

/// Update a profile.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(performance_type) = input.performance_type {
        active.performance_type = Set(performance_type);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(bio) = input.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(website) = input.website {
        active.website = Set(Some(website));
    }
    if let Some(social_media) = input.social_media {
        active.social_media = Set(social_media_json(Some(social_media)));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a profile by ID.
pub async fn delete_profile(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    profiles::Entity::delete_by_id(id).exec(db).await
}
