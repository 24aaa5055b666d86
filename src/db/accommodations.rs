use sea_orm::*;
use uuid::Uuid;

use crate::models::accommodations::{self, AttachAccommodation};

/// Fetch the accommodation attached to an event, if any.
pub async fn get_by_event_id<C: ConnectionTrait>(
    db: &C,
    event_id: Uuid,
) -> Result<Option<accommodations::Model>, DbErr> {
    accommodations::Entity::find()
        .filter(accommodations::Column::EventId.eq(event_id))
        .one(db)
        .await
}

/// Attach lodging details to an event, replacing any prior record.
pub async fn upsert_for_event<C: ConnectionTrait>(
    db: &C,
    event_id: Uuid,
    input: AttachAccommodation,
) -> Result<accommodations::Model, DbErr> {
    match get_by_event_id(db, event_id).await? {
        Some(existing) => {
            let mut active: accommodations::ActiveModel = existing.into();
            active.name = Set(input.name);
            active.contact_person = Set(input.contact_person);
            active.address = Set(input.address);
            active.telephone_number = Set(input.telephone_number);
            active.updated_at = Set(Some(chrono::Utc::now()));
            active.update(db).await
        }
        None => {
            let new_accommodation = accommodations::ActiveModel {
                id: Set(Uuid::new_v4()),
                event_id: Set(event_id),
                name: Set(input.name),
                contact_person: Set(input.contact_person),
                address: Set(input.address),
                telephone_number: Set(input.telephone_number),
                created_at: Set(chrono::Utc::now()),
                updated_at: Set(None),
            };
            new_accommodation.insert(db).await
        }
    }
}

/// Remove the accommodation attached to an event, if any.
pub async fn delete_for_event<C: ConnectionTrait>(
    db: &C,
    event_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    accommodations::Entity::delete_many()
        .filter(accommodations::Column::EventId.eq(event_id))
        .exec(db)
        .await
}
