//! Accommodation Registry: at most one lodging record per event, frozen
//! together with the rest of the contract once it reaches a terminal state.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::db::accommodations as accommodation_db;
use crate::db::contracts as contract_db;
use crate::db::events as event_db;
use crate::engine::contracts::{ensure_party, touch_guarded};
use crate::engine::EngineError;
use crate::models::accommodations::{self, AttachAccommodation};
use crate::models::events;

/// Resolve the event and its parent contract, checking that the actor is a
/// party and the contract is still mutable. Bumps the contract's version so
/// the write conflicts with concurrent lifecycle transitions.
async fn resolve_open_event(
    txn: &DatabaseTransaction,
    event_id: Uuid,
    acting_party_id: Uuid,
    operation: &'static str,
) -> Result<events::Model, EngineError> {
    let event = event_db::get_event_by_id(txn, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Event",
            id: event_id,
        })?;
    let contract = contract_db::get_contract_by_id(txn, event.contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: event.contract_id,
        })?;
    ensure_party(&contract, acting_party_id)?;
    if contract.status.is_terminal() {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation,
        });
    }
    touch_guarded(txn, &contract).await?;
    Ok(event)
}

/// Attach lodging details to an event. Attaching again overwrites the prior
/// record — lodging commonly changes while a tour is being arranged.
pub async fn attach_accommodation(
    db: &DatabaseConnection,
    event_id: Uuid,
    acting_party_id: Uuid,
    input: AttachAccommodation,
) -> Result<accommodations::Model, EngineError> {
    let txn = db.begin().await?;

    resolve_open_event(&txn, event_id, acting_party_id, "attach lodging to").await?;
    let accommodation = accommodation_db::upsert_for_event(&txn, event_id, input).await?;
    txn.commit().await?;

    tracing::info!(event_id = %event_id, accommodation_id = %accommodation.id,
        "accommodation attached");
    Ok(accommodation)
}

/// Fetch the accommodation attached to an event.
pub async fn get_accommodation(
    db: &DatabaseConnection,
    event_id: Uuid,
) -> Result<accommodations::Model, EngineError> {
    event_db::get_event_by_id(db, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Event",
            id: event_id,
        })?;
    accommodation_db::get_by_event_id(db, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Accommodation",
            id: event_id,
        })
}

/// Detach the accommodation from an event while the contract is still live.
pub async fn remove_accommodation(
    db: &DatabaseConnection,
    event_id: Uuid,
    acting_party_id: Uuid,
) -> Result<(), EngineError> {
    let txn = db.begin().await?;

    resolve_open_event(&txn, event_id, acting_party_id, "detach lodging from").await?;
    let result = accommodation_db::delete_for_event(&txn, event_id).await?;
    if result.rows_affected == 0 {
        return Err(EngineError::NotFound {
            resource: "Accommodation",
            id: event_id,
        });
    }
    txn.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contracts::{self, Status};
    use chrono::{NaiveTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn fixtures() -> (events::Model, contracts::Model) {
        let contract = contracts::Model {
            id: Uuid::new_v4(),
            name: "Summer tour".to_string(),
            offeror_id: Uuid::new_v4(),
            offeree_id: Uuid::new_v4(),
            currency_code: "EUR".to_string(),
            upon_signing: 100,
            upon_completion: 0,
            payment_method: "bank transfer".to_string(),
            status: Status::Signed,
            offeror_signed: true,
            offeree_signed: true,
            signed_at: Some(Utc::now()),
            version: 0,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let event = events::Model {
            id: Uuid::new_v4(),
            contract_id: contract.id,
            name: "Festival set".to_string(),
            date: Utc::now().date_naive(),
            start_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            duration_minutes: 120,
            venue: None,
            contact_person: None,
            contact_phone: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        (event, contract)
    }

    #[tokio::test]
    async fn attach_aborts_when_contract_version_moved() {
        let (event, contract) = fixtures();
        let event_id = event.id;
        let offeror = contract.offeror_id;

        // Event and contract reads succeed, but the version-guarded touch
        // hits zero rows: a lifecycle transition committed in between.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![event]])
            .append_query_results([vec![contract]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let input = AttachAccommodation {
            name: "Hotel Adria".to_string(),
            contact_person: None,
            address: "Obala 1, Split".to_string(),
            telephone_number: "+385 21 000 000".to_string(),
        };

        let result = attach_accommodation(&db, event_id, offeror, input).await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }
}
