use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, CompleteProfile, CreateUserFromAuth, UpdateUser};

/// Create a new user from validated JWT claims (called by the auth middleware).
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    // Try to find the user first (by the identity provider's subject UUID).
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    // User doesn't exist yet — create from JWT claims. Legal and fiscal
    // fields stay empty until the user completes their profile.
    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        username: Set(None),
        entity_type: Set(input.entity_type),
        name: Set(None),
        surname: Set(None),
        phone_number: Set(None),
        vat_id: Set(None),
        bank_account: Set(None),
        auth_provider: Set(input.auth_provider),
        is_active: Set(true),
        deactivated_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch all users.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find().all(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Complete a user's profile (username, entity type, legal/fiscal fields).
pub async fn complete_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: CompleteProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(username) = input.username {
        active.username = Set(Some(username));
    }
    if let Some(entity_type) = input.entity_type {
        active.entity_type = Set(entity_type);
    }
    if let Some(name) = input.name {
        active.name = Set(Some(name));
    }
    if let Some(surname) = input.surname {
        active.surname = Set(Some(surname));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(vat_id) = input.vat_id {
        active.vat_id = Set(Some(vat_id));
    }
    if let Some(bank_account) = input.bank_account {
        active.bank_account = Set(Some(bank_account));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Update a user's contact and fiscal fields.
pub async fn update_user(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateUser,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(name) = input.name {
        active.name = Set(Some(name));
    }
    if let Some(surname) = input.surname {
        active.surname = Set(Some(surname));
    }
    if let Some(phone_number) = input.phone_number {
        active.phone_number = Set(Some(phone_number));
    }
    if let Some(vat_id) = input.vat_id {
        active.vat_id = Set(Some(vat_id));
    }
    if let Some(bank_account) = input.bank_account {
        active.bank_account = Set(Some(bank_account));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Soft-deactivate a user. The row stays — contracts reference it through
/// the user's profiles.
pub async fn deactivate_user(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.is_active = Set(false);
    active.deactivated_at = Set(Some(chrono::Utc::now()));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
