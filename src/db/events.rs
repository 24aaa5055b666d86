use sea_orm::*;
use uuid::Uuid;

use crate::models::events::{self, CreateEvent};

/// Insert a new event. The scheduler has already validated the time range
/// and derived `duration_minutes`.
pub async fn insert_event<C: ConnectionTrait>(
    db: &C,
    input: CreateEvent,
    duration_minutes: i32,
) -> Result<events::Model, DbErr> {
    let new_event = events::ActiveModel {
        id: Set(Uuid::new_v4()),
        contract_id: Set(input.contract_id),
        name: Set(input.name),
        date: Set(input.date),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        duration_minutes: Set(duration_minutes),
        venue: Set(input.venue),
        contact_person: Set(input.contact_person),
        contact_phone: Set(input.contact_phone),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_event.insert(db).await
}

/// Fetch a single event by ID.
pub async fn get_event_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<events::Model>, DbErr> {
    events::Entity::find_by_id(id).one(db).await
}

/// Fetch all events of a contract, ordered by date then start time.
pub async fn get_events_by_contract_id<C: ConnectionTrait>(
    db: &C,
    contract_id: Uuid,
) -> Result<Vec<events::Model>, DbErr> {
    events::Entity::find()
        .filter(events::Column::ContractId.eq(contract_id))
        .order_by_asc(events::Column::Date)
        .order_by_asc(events::Column::StartTime)
        .all(db)
        .await
}

/// Persist an already-merged event active model.
pub async fn update_event<C: ConnectionTrait>(
    db: &C,
    mut active: events::ActiveModel,
) -> Result<events::Model, DbErr> {
    active.updated_at = Set(Some(chrono::Utc::now()));
    active.update(db).await
}

/// Delete an event by ID (its accommodation cascades at the schema level).
pub async fn delete_event<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    events::Entity::delete_by_id(id).exec(db).await
}
