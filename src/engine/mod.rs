//! The contract lifecycle engine.
//!
//! Everything with non-trivial invariants lives here: party and payment
//! checks on contracts, the signing state machine, temporal consistency of
//! events, and the one-per-event accommodation rule. The engine validates
//! before it writes — a failed operation never leaves a partial mutation —
//! and multi-step mutations run inside a single database transaction with a
//! version guard on the contract row. HTTP and serialization concerns stay
//! in the handler layer.

pub mod accommodations;
pub mod contracts;
pub mod events;

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::contracts::Status;

/// Typed failures returned by every engine operation.
///
/// `Unavailable` is the only kind worth retrying; the rest need corrected
/// input or a state change first.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: Uuid },

    #[error("invalid party: {0}")]
    InvalidParty(String),

    #[error("invalid payment terms: {0}")]
    InvalidPaymentTerms(String),

    #[error("cannot {operation} a {state:?} contract")]
    InvalidState {
        state: Status,
        operation: &'static str,
    },

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("not a party to this contract: {0}")]
    Unauthorized(Uuid),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<DbErr> for EngineError {
    fn from(e: DbErr) -> Self {
        EngineError::Unavailable(e.to_string())
    }
}
