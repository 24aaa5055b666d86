use sea_orm::*;
use uuid::Uuid;

use crate::models::contracts::{self, CreateContract, Status};

/// Insert a new contract in Draft with both signature flags down.
pub async fn insert_contract<C: ConnectionTrait>(
    db: &C,
    offeror_id: Uuid,
    input: CreateContract,
) -> Result<contracts::Model, DbErr> {
    let new_contract = contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        offeror_id: Set(offeror_id),
        offeree_id: Set(input.offeree_id),
        currency_code: Set(input.currency_code),
        upon_signing: Set(input.upon_signing),
        upon_completion: Set(input.upon_completion),
        payment_method: Set(input.payment_method),
        status: Set(Status::Draft),
        offeror_signed: Set(false),
        offeree_signed: Set(false),
        signed_at: Set(None),
        version: Set(0),
        deleted_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_contract.insert(db).await
}

/// Fetch a single contract by ID. Soft-deleted contracts are invisible.
pub async fn get_contract_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id)
        .filter(contracts::Column::DeletedAt.is_null())
        .one(db)
        .await
}

/// Fetch all live contracts where any of the given profiles is a party.
pub async fn get_contracts_for_profiles(
    db: &DatabaseConnection,
    profile_ids: Vec<Uuid>,
) -> Result<Vec<contracts::Model>, DbErr> {
    if profile_ids.is_empty() {
        return Ok(Vec::new());
    }

    contracts::Entity::find()
        .filter(contracts::Column::DeletedAt.is_null())
        .filter(
            Condition::any()
                .add(contracts::Column::OfferorId.is_in(profile_ids.clone()))
                .add(contracts::Column::OffereeId.is_in(profile_ids)),
        )
        .all(db)
        .await
}

/// Apply a version-guarded update to a contract.
///
/// The write is filtered on the version the caller read, so a concurrent
/// writer that got there first makes this a no-op; `None` tells the caller
/// the contract changed under them and the operation must be retried. Every
/// successful write bumps the version.
pub async fn update_guarded<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    expected_version: i32,
    mut active: contracts::ActiveModel,
) -> Result<Option<contracts::Model>, DbErr> {
    active.version = Set(expected_version + 1);
    active.updated_at = Set(Some(chrono::Utc::now()));

    let result = contracts::Entity::update_many()
        .set(active)
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Version.eq(expected_version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    contracts::Entity::find_by_id(id).one(db).await
}
