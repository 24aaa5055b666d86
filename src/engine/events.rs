//! Event Scheduler: events owned by a contract, with temporal-consistency
//! checks and a frozen schedule once signatures start landing.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::db::events as event_db;
use crate::engine::contracts::{ensure_party, touch_guarded};
use crate::engine::EngineError;
use crate::models::contracts;
use crate::models::events::{self, CreateEvent, UpdateEvent};

// ── Pure invariant checks ──

/// An event must start before it ends (same-day schedule).
pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), EngineError> {
    if start >= end {
        return Err(EngineError::InvalidTimeRange(format!(
            "start {start} must be before end {end}"
        )));
    }
    Ok(())
}

/// Duration is denormalized; derive it from the range so it cannot drift.
pub fn derive_duration_minutes(start: NaiveTime, end: NaiveTime) -> i32 {
    (end - start).num_minutes() as i32
}

/// New schedule entries cannot be placed in the past.
pub fn ensure_schedulable_date(date: NaiveDate, today: NaiveDate) -> Result<(), EngineError> {
    if date < today {
        return Err(EngineError::InvalidTimeRange(format!(
            "event date {date} is in the past"
        )));
    }
    Ok(())
}

fn ensure_contract_open(
    contract: &contracts::Model,
    operation: &'static str,
) -> Result<(), EngineError> {
    if contract.status.is_terminal() {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation,
        });
    }
    Ok(())
}

// ── Operations ──

/// Add an event to a contract's schedule.
pub async fn add_event(
    db: &DatabaseConnection,
    acting_party_id: Uuid,
    input: CreateEvent,
) -> Result<events::Model, EngineError> {
    validate_time_range(input.start_time, input.end_time)?;
    ensure_schedulable_date(input.date, chrono::Utc::now().date_naive())?;

    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, input.contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: input.contract_id,
        })?;
    ensure_party(&contract, acting_party_id)?;
    ensure_contract_open(&contract, "add an event to")?;
    // Joins the contract's version guard so a concurrent lifecycle
    // transition cannot read a stale schedule.
    touch_guarded(&txn, &contract).await?;

    let duration = derive_duration_minutes(input.start_time, input.end_time);
    let event = event_db::insert_event(&txn, input, duration).await?;
    txn.commit().await?;

    tracing::info!(event_id = %event.id, contract_id = %event.contract_id, "event scheduled");
    Ok(event)
}

/// Update an event while its contract is still live. The merged time range
/// is re-validated and the duration re-derived.
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: Uuid,
    acting_party_id: Uuid,
    input: UpdateEvent,
) -> Result<events::Model, EngineError> {
    let txn = db.begin().await?;

    let event = event_db::get_event_by_id(&txn, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Event",
            id: event_id,
        })?;
    let contract = contract_db::get_contract_by_id(&txn, event.contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: event.contract_id,
        })?;
    ensure_party(&contract, acting_party_id)?;
    ensure_contract_open(&contract, "edit an event of")?;
    touch_guarded(&txn, &contract).await?;

    let date = input.date.unwrap_or(event.date);
    let start_time = input.start_time.unwrap_or(event.start_time);
    let end_time = input.end_time.unwrap_or(event.end_time);
    validate_time_range(start_time, end_time)?;
    if input.date.is_some() {
        ensure_schedulable_date(date, chrono::Utc::now().date_naive())?;
    }

    let mut active: events::ActiveModel = event.into();
    active.date = Set(date);
    active.start_time = Set(start_time);
    active.end_time = Set(end_time);
    active.duration_minutes = Set(derive_duration_minutes(start_time, end_time));
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(venue) = input.venue {
        active.venue = Set(Some(venue));
    }
    if let Some(contact_person) = input.contact_person {
        active.contact_person = Set(Some(contact_person));
    }
    if let Some(contact_phone) = input.contact_phone {
        active.contact_phone = Set(Some(contact_phone));
    }

    let updated = event_db::update_event(&txn, active).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Remove an event. Only legal while the contract is still in Draft — after
/// the first signature the agreed schedule is frozen and cancelling the
/// whole contract is the only way out.
pub async fn remove_event(
    db: &DatabaseConnection,
    event_id: Uuid,
    acting_party_id: Uuid,
) -> Result<(), EngineError> {
    let txn = db.begin().await?;

    let event = event_db::get_event_by_id(&txn, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Event",
            id: event_id,
        })?;
    let contract = contract_db::get_contract_by_id(&txn, event.contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: event.contract_id,
        })?;
    ensure_party(&contract, acting_party_id)?;
    if contract.status != contracts::Status::Draft {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation: "remove an event from",
        });
    }
    touch_guarded(&txn, &contract).await?;

    event_db::delete_event(&txn, event_id).await?;
    txn.commit().await?;

    tracing::info!(event_id = %event_id, contract_id = %contract.id, "event removed");
    Ok(())
}

/// Fetch one event.
pub async fn get_event(
    db: &DatabaseConnection,
    event_id: Uuid,
) -> Result<events::Model, EngineError> {
    event_db::get_event_by_id(db, event_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Event",
            id: event_id,
        })
}

/// The contract's schedule, ordered by date then start time.
pub async fn list_events(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<Vec<events::Model>, EngineError> {
    contract_db::get_contract_by_id(db, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;
    Ok(event_db::get_events_by_contract_id(db, contract_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn contract(status: contracts::Status) -> contracts::Model {
        contracts::Model {
            id: Uuid::new_v4(),
            name: "Summer tour".to_string(),
            offeror_id: Uuid::new_v4(),
            offeree_id: Uuid::new_v4(),
            currency_code: "EUR".to_string(),
            upon_signing: 100,
            upon_completion: 0,
            payment_method: "bank transfer".to_string(),
            status,
            offeror_signed: false,
            offeree_signed: false,
            signed_at: None,
            version: 0,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn start_must_be_before_end() {
        assert!(validate_time_range(t(14, 0), t(18, 0)).is_ok());
        // 14:00–13:00 is inverted, 14:00–14:00 is empty.
        assert!(matches!(
            validate_time_range(t(14, 0), t(13, 0)),
            Err(EngineError::InvalidTimeRange(_))
        ));
        assert!(matches!(
            validate_time_range(t(14, 0), t(14, 0)),
            Err(EngineError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn duration_equals_end_minus_start() {
        assert_eq!(derive_duration_minutes(t(14, 0), t(18, 0)), 240);
        assert_eq!(derive_duration_minutes(t(20, 30), t(23, 45)), 195);
        assert_eq!(derive_duration_minutes(t(9, 0), t(9, 1)), 1);
    }

    #[test]
    fn past_dates_cannot_be_scheduled() {
        let today = chrono::Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();
        let tomorrow = today.succ_opt().unwrap();

        assert!(ensure_schedulable_date(tomorrow, today).is_ok());
        assert!(ensure_schedulable_date(today, today).is_ok());
        assert!(matches!(
            ensure_schedulable_date(yesterday, today),
            Err(EngineError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn schedule_is_frozen_in_terminal_states() {
        for status in [contracts::Status::Completed, contracts::Status::Cancelled] {
            assert!(matches!(
                ensure_contract_open(&contract(status), "edit an event of"),
                Err(EngineError::InvalidState { .. })
            ));
        }
        for status in [
            contracts::Status::Draft,
            contracts::Status::PartiallySigned,
            contracts::Status::Signed,
        ] {
            assert!(ensure_contract_open(&contract(status), "edit an event of").is_ok());
        }
    }

    #[tokio::test]
    async fn event_insert_aborts_when_contract_version_moved() {
        let c = contract(contracts::Status::Signed);
        let contract_id = c.id;
        let offeror = c.offeror_id;

        // The contract read succeeds, but the version-guarded touch hits
        // zero rows: another writer bumped the version in between.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![c]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let input = CreateEvent {
            contract_id,
            name: "Festival set".to_string(),
            date: Utc::now().date_naive().succ_opt().unwrap(),
            start_time: t(20, 0),
            end_time: t(22, 0),
            venue: None,
            contact_person: None,
            contact_phone: None,
        };

        let result = add_event(&db, offeror, input).await;
        assert!(matches!(result, Err(EngineError::Unavailable(_))));
    }
}
