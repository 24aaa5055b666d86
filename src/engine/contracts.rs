//! Contract Engine: creation, negotiation, two-phase signing, cancellation
//! and completion of contracts between an offeror and an offeree profile.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::db::events as event_db;
use crate::db::profiles as profile_db;
use crate::engine::EngineError;
use crate::models::contracts::{self, CreateContract, Status, UpdateContractTerms};
use crate::models::events;
use crate::models::profiles;

// ── Pure invariant checks ──

/// Both amounts non-negative, at least one non-zero.
pub fn validate_payment_terms(upon_signing: i64, upon_completion: i64) -> Result<(), EngineError> {
    if upon_signing < 0 || upon_completion < 0 {
        return Err(EngineError::InvalidPaymentTerms(format!(
            "amounts must be non-negative (got {upon_signing} / {upon_completion})"
        )));
    }
    if upon_signing == 0 && upon_completion == 0 {
        return Err(EngineError::InvalidPaymentTerms(
            "at least one of upon_signing / upon_completion must be non-zero".to_string(),
        ));
    }
    Ok(())
}

/// ISO-4217-style code: exactly three ASCII uppercase letters.
pub fn validate_currency_code(code: &str) -> Result<(), EngineError> {
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(EngineError::InvalidPaymentTerms(format!(
            "invalid currency code {code:?}"
        )));
    }
    Ok(())
}

/// A contract needs two distinct parties; two profiles of the same user
/// would be self-dealing.
pub fn ensure_distinct_parties(
    offeror: &profiles::Model,
    offeree: &profiles::Model,
) -> Result<(), EngineError> {
    if offeror.id == offeree.id {
        return Err(EngineError::InvalidParty(
            "offeror and offeree must be distinct profiles".to_string(),
        ));
    }
    if offeror.user_id == offeree.user_id {
        return Err(EngineError::InvalidParty(
            "offeror and offeree profiles belong to the same user".to_string(),
        ));
    }
    Ok(())
}

/// Fail unless the given profile is one of the contract's two parties.
pub fn ensure_party(contract: &contracts::Model, party_id: Uuid) -> Result<(), EngineError> {
    if contract.offeror_id != party_id && contract.offeree_id != party_id {
        return Err(EngineError::Unauthorized(party_id));
    }
    Ok(())
}

/// Outcome of recording one party's signature.
#[derive(Debug, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// This party had already signed; nothing changes.
    AlreadyRecorded,
    /// New signature flags and the resulting lifecycle state.
    Recorded {
        status: Status,
        offeror_signed: bool,
        offeree_signed: bool,
    },
}

/// Record a signature against the current contract state.
///
/// First distinct signature moves Draft to PartiallySigned, the second
/// completes the transition to Signed. Re-signing by the same party is a
/// no-op rather than an error.
pub fn apply_signature(
    contract: &contracts::Model,
    signing_party_id: Uuid,
) -> Result<SignatureOutcome, EngineError> {
    ensure_party(contract, signing_party_id)?;

    if !matches!(contract.status, Status::Draft | Status::PartiallySigned) {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation: "sign",
        });
    }

    let is_offeror = contract.offeror_id == signing_party_id;
    let already_signed = if is_offeror {
        contract.offeror_signed
    } else {
        contract.offeree_signed
    };
    if already_signed {
        return Ok(SignatureOutcome::AlreadyRecorded);
    }

    let offeror_signed = contract.offeror_signed || is_offeror;
    let offeree_signed = contract.offeree_signed || !is_offeror;
    let status = if offeror_signed && offeree_signed {
        Status::Signed
    } else {
        Status::PartiallySigned
    };

    Ok(SignatureOutcome::Recorded {
        status,
        offeror_signed,
        offeree_signed,
    })
}

/// Completion requires a signed contract whose schedule has fully played
/// out: at least one event, every event date strictly in the past.
pub fn ensure_completable(
    status: Status,
    event_dates: &[NaiveDate],
    today: NaiveDate,
) -> Result<(), EngineError> {
    if status != Status::Signed {
        return Err(EngineError::InvalidState {
            state: status,
            operation: "complete",
        });
    }
    if event_dates.is_empty() || event_dates.iter().any(|d| *d >= today) {
        return Err(EngineError::InvalidState {
            state: status,
            operation: "complete",
        });
    }
    Ok(())
}

// ── Operations ──

/// Open a new contract in Draft, with the acting profile as offeror.
pub async fn create_contract(
    db: &DatabaseConnection,
    offeror_profile_id: Uuid,
    input: CreateContract,
) -> Result<contracts::Model, EngineError> {
    validate_payment_terms(input.upon_signing, input.upon_completion)?;
    validate_currency_code(&input.currency_code)?;

    let txn = db.begin().await?;

    let offeror = profile_db::get_profile_by_id(&txn, offeror_profile_id)
        .await?
        .ok_or_else(|| {
            EngineError::InvalidParty(format!("offeror profile {offeror_profile_id} not found"))
        })?;
    let offeree = profile_db::get_profile_by_id(&txn, input.offeree_id)
        .await?
        .ok_or_else(|| {
            EngineError::InvalidParty(format!("offeree profile {} not found", input.offeree_id))
        })?;
    ensure_distinct_parties(&offeror, &offeree)?;

    let contract = contract_db::insert_contract(&txn, offeror_profile_id, input).await?;
    txn.commit().await?;

    tracing::info!(contract_id = %contract.id, offeror = %contract.offeror_id,
        offeree = %contract.offeree_id, "contract created");
    Ok(contract)
}

/// Update negotiable terms. Legal in any non-terminal state; the merged
/// terms must still satisfy the payment invariants.
pub async fn update_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
    acting_party_id: Uuid,
    input: UpdateContractTerms,
) -> Result<contracts::Model, EngineError> {
    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;
    ensure_party(&contract, acting_party_id)?;
    if contract.status.is_terminal() {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation: "update",
        });
    }

    let upon_signing = input.upon_signing.unwrap_or(contract.upon_signing);
    let upon_completion = input.upon_completion.unwrap_or(contract.upon_completion);
    validate_payment_terms(upon_signing, upon_completion)?;
    let currency_code = input
        .currency_code
        .unwrap_or_else(|| contract.currency_code.clone());
    validate_currency_code(&currency_code)?;

    let mut active = contracts::ActiveModel {
        upon_signing: Set(upon_signing),
        upon_completion: Set(upon_completion),
        currency_code: Set(currency_code),
        ..Default::default()
    };
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(payment_method) = input.payment_method {
        active.payment_method = Set(payment_method);
    }

    let updated = contract_db::update_guarded(&txn, contract_id, contract.version, active)
        .await?
        .ok_or_else(|| concurrent_update(contract_id))?;
    txn.commit().await?;

    Ok(updated)
}

/// Record one party's signature; see [`apply_signature`] for the rules.
pub async fn sign_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
    signing_party_id: Uuid,
) -> Result<contracts::Model, EngineError> {
    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;

    let (status, offeror_signed, offeree_signed) =
        match apply_signature(&contract, signing_party_id)? {
            SignatureOutcome::AlreadyRecorded => {
                txn.commit().await?;
                return Ok(contract);
            }
            SignatureOutcome::Recorded {
                status,
                offeror_signed,
                offeree_signed,
            } => (status, offeror_signed, offeree_signed),
        };

    let mut active = contracts::ActiveModel {
        status: Set(status),
        offeror_signed: Set(offeror_signed),
        offeree_signed: Set(offeree_signed),
        ..Default::default()
    };
    if status == Status::Signed {
        active.signed_at = Set(Some(chrono::Utc::now()));
    }

    let updated = contract_db::update_guarded(&txn, contract_id, contract.version, active)
        .await?
        .ok_or_else(|| concurrent_update(contract_id))?;
    txn.commit().await?;

    tracing::info!(contract_id = %contract_id, party = %signing_party_id,
        status = ?status, "contract signed");
    Ok(updated)
}

/// Cancel a contract from any non-terminal state. Owned events are frozen
/// by the terminal-state guards, not deleted.
pub async fn cancel_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
    requesting_party_id: Uuid,
) -> Result<contracts::Model, EngineError> {
    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;
    ensure_party(&contract, requesting_party_id)?;
    if contract.status.is_terminal() {
        return Err(EngineError::InvalidState {
            state: contract.status,
            operation: "cancel",
        });
    }

    let active = contracts::ActiveModel {
        status: Set(Status::Cancelled),
        ..Default::default()
    };
    let updated = contract_db::update_guarded(&txn, contract_id, contract.version, active)
        .await?
        .ok_or_else(|| concurrent_update(contract_id))?;
    txn.commit().await?;

    tracing::info!(contract_id = %contract_id, party = %requesting_party_id, "contract cancelled");
    Ok(updated)
}

/// Administrative transition to Completed once the whole schedule has
/// passed. No actor check — callers gate access themselves.
pub async fn complete_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, EngineError> {
    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;

    let events = event_db::get_events_by_contract_id(&txn, contract_id).await?;
    let dates: Vec<NaiveDate> = events.iter().map(|e: &events::Model| e.date).collect();
    ensure_completable(contract.status, &dates, chrono::Utc::now().date_naive())?;

    let active = contracts::ActiveModel {
        status: Set(Status::Completed),
        ..Default::default()
    };
    let updated = contract_db::update_guarded(&txn, contract_id, contract.version, active)
        .await?
        .ok_or_else(|| concurrent_update(contract_id))?;
    txn.commit().await?;

    tracing::info!(contract_id = %contract_id, "contract completed");
    Ok(updated)
}

/// Fetch a single live contract.
pub async fn get_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, EngineError> {
    contract_db::get_contract_by_id(db, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })
}

/// All live contracts in which any of the user's profiles is a party.
pub async fn list_contracts_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<contracts::Model>, EngineError> {
    let profile_ids = profile_db::get_profile_ids_for_user(db, user_id).await?;
    Ok(contract_db::get_contracts_for_profiles(db, profile_ids).await?)
}

/// Administrative soft delete. The row survives for financial history;
/// reads no longer see it.
pub async fn delete_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, EngineError> {
    let txn = db.begin().await?;

    let contract = contract_db::get_contract_by_id(&txn, contract_id)
        .await?
        .ok_or(EngineError::NotFound {
            resource: "Contract",
            id: contract_id,
        })?;

    let active = contracts::ActiveModel {
        deleted_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    let updated = contract_db::update_guarded(&txn, contract_id, contract.version, active)
        .await?
        .ok_or_else(|| concurrent_update(contract_id))?;
    txn.commit().await?;

    tracing::warn!(contract_id = %contract_id, "contract soft-deleted");
    Ok(updated)
}

fn concurrent_update(contract_id: Uuid) -> EngineError {
    EngineError::Unavailable(format!(
        "contract {contract_id} was modified concurrently; retry"
    ))
}

/// Bump the contract's version without changing any terms.
///
/// Mutations of owned rows (events, accommodations) run this inside their
/// transaction so they collide with a concurrent lifecycle transition
/// instead of slipping past its version guard.
pub(crate) async fn touch_guarded<C: ConnectionTrait>(
    db: &C,
    contract: &contracts::Model,
) -> Result<(), EngineError> {
    contract_db::update_guarded(
        db,
        contract.id,
        contract.version,
        contracts::ActiveModel::default(),
    )
    .await?
    .ok_or_else(|| concurrent_update(contract.id))
    .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn profile(id: Uuid, user_id: Uuid) -> profiles::Model {
        profiles::Model {
            id,
            user_id,
            name: "Test act".to_string(),
            performance_type: "band".to_string(),
            description: None,
            bio: None,
            website: None,
            social_media: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn contract(offeror: Uuid, offeree: Uuid, status: Status) -> contracts::Model {
        contracts::Model {
            id: Uuid::new_v4(),
            name: "Summer tour".to_string(),
            offeror_id: offeror,
            offeree_id: offeree,
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
    fn payment_terms_accept_one_sided_amounts() {
        assert!(validate_payment_terms(100, 0).is_ok());
        assert!(validate_payment_terms(0, 250).is_ok());
        assert!(validate_payment_terms(50, 50).is_ok());
    }

    #[test]
    fn payment_terms_reject_all_zero_and_negative() {
        assert!(matches!(
            validate_payment_terms(0, 0),
            Err(EngineError::InvalidPaymentTerms(_))
        ));
        assert!(matches!(
            validate_payment_terms(-1, 100),
            Err(EngineError::InvalidPaymentTerms(_))
        ));
        assert!(matches!(
            validate_payment_terms(100, -20),
            Err(EngineError::InvalidPaymentTerms(_))
        ));
    }

    #[test]
    fn currency_code_must_be_three_uppercase_letters() {
        assert!(validate_currency_code("EUR").is_ok());
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("eur").is_err());
        assert!(validate_currency_code("EURO").is_err());
        assert!(validate_currency_code("E1R").is_err());
    }

    #[test]
    fn same_profile_on_both_sides_is_rejected() {
        let user = Uuid::new_v4();
        let p = profile(Uuid::new_v4(), user);
        assert!(matches!(
            ensure_distinct_parties(&p, &p),
            Err(EngineError::InvalidParty(_))
        ));
    }

    #[test]
    fn two_profiles_of_the_same_user_are_rejected() {
        let user = Uuid::new_v4();
        let a = profile(Uuid::new_v4(), user);
        let b = profile(Uuid::new_v4(), user);
        assert!(matches!(
            ensure_distinct_parties(&a, &b),
            Err(EngineError::InvalidParty(_))
        ));
    }

    #[test]
    fn distinct_users_pass_the_party_check() {
        let a = profile(Uuid::new_v4(), Uuid::new_v4());
        let b = profile(Uuid::new_v4(), Uuid::new_v4());
        assert!(ensure_distinct_parties(&a, &b).is_ok());
    }

    #[test]
    fn first_signature_moves_draft_to_partially_signed() {
        let offeror = Uuid::new_v4();
        let offeree = Uuid::new_v4();
        let c = contract(offeror, offeree, Status::Draft);

        match apply_signature(&c, offeror).unwrap() {
            SignatureOutcome::Recorded {
                status,
                offeror_signed,
                offeree_signed,
            } => {
                assert_eq!(status, Status::PartiallySigned);
                assert!(offeror_signed);
                assert!(!offeree_signed);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn re_signing_by_the_same_party_is_a_no_op() {
        let offeror = Uuid::new_v4();
        let offeree = Uuid::new_v4();
        let mut c = contract(offeror, offeree, Status::PartiallySigned);
        c.offeror_signed = true;

        assert_eq!(
            apply_signature(&c, offeror).unwrap(),
            SignatureOutcome::AlreadyRecorded
        );
    }

    #[test]
    fn second_party_signature_completes_the_transition() {
        let offeror = Uuid::new_v4();
        let offeree = Uuid::new_v4();
        let mut c = contract(offeror, offeree, Status::PartiallySigned);
        c.offeror_signed = true;

        match apply_signature(&c, offeree).unwrap() {
            SignatureOutcome::Recorded {
                status,
                offeror_signed,
                offeree_signed,
            } => {
                assert_eq!(status, Status::Signed);
                assert!(offeror_signed && offeree_signed);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn non_party_cannot_sign() {
        let c = contract(Uuid::new_v4(), Uuid::new_v4(), Status::Draft);
        assert!(matches!(
            apply_signature(&c, Uuid::new_v4()),
            Err(EngineError::Unauthorized(_))
        ));
    }

    #[test]
    fn signing_a_terminal_or_signed_contract_fails() {
        let offeror = Uuid::new_v4();
        let offeree = Uuid::new_v4();
        for status in [Status::Signed, Status::Completed, Status::Cancelled] {
            let c = contract(offeror, offeree, status);
            assert!(matches!(
                apply_signature(&c, offeror),
                Err(EngineError::InvalidState { .. })
            ));
        }
    }

    #[test]
    fn completion_requires_signed_state() {
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let today = Utc::now().date_naive();
        for status in [Status::Draft, Status::PartiallySigned, Status::Cancelled] {
            assert!(matches!(
                ensure_completable(status, &[yesterday], today),
                Err(EngineError::InvalidState { .. })
            ));
        }
        assert!(ensure_completable(Status::Signed, &[yesterday], today).is_ok());
    }

    #[test]
    fn completion_requires_all_event_dates_passed() {
        let today = Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();
        let tomorrow = today.succ_opt().unwrap();

        assert!(matches!(
            ensure_completable(Status::Signed, &[yesterday, tomorrow], today),
            Err(EngineError::InvalidState { .. })
        ));
        // A same-day event has not passed yet.
        assert!(ensure_completable(Status::Signed, &[today], today).is_err());
        // No events at all means there was nothing to perform.
        assert!(ensure_completable(Status::Signed, &[], today).is_err());
    }

    #[test]
    fn only_completed_and_cancelled_are_terminal() {
        assert!(Status::Completed.is_terminal());
        assert!(Status::Cancelled.is_terminal());
        for status in [Status::Draft, Status::PartiallySigned, Status::Signed] {
            assert!(!status.is_terminal());
        }
    }

    #[tokio::test]
    async fn cancelling_a_completed_contract_is_rejected() {
        let offeror = Uuid::new_v4();
        let c = contract(offeror, Uuid::new_v4(), Status::Completed);
        let contract_id = c.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![c]])
            .into_connection();

        let result = cancel_contract(&db, contract_id, offeror).await;
        assert!(matches!(
            result,
            Err(EngineError::InvalidState {
                state: Status::Completed,
                ..
            })
        ));
    }
}
