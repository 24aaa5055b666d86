use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles as profile_db;
use crate::engine::contracts as contract_engine;
use crate::engine::events as event_engine;
use crate::handlers::{acting_party, engine_error, party_for_contract};
use crate::models::contracts::{CreateContract, UpdateContractTerms};

/// POST /api/contracts — open a contract as offeror, on one of the
/// authenticated user's profiles.
pub async fn create_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateContractRequest>,
) -> impl Responder {
    let req = body.into_inner();

    // The offeror profile must belong to the requester.
    match profile_db::profile_owned_by(db.get_ref(), req.offeror_profile_id, user.0.id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "You can only open contracts on your own profiles",
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    let input = CreateContract {
        name: req.name,
        offeree_id: req.offeree_id,
        currency_code: req.currency_code,
        upon_signing: req.upon_signing,
        upon_completion: req.upon_completion,
        payment_method: req.payment_method,
    };

    match contract_engine::create_contract(db.get_ref(), req.offeror_profile_id, input).await {
        Ok(contract) => HttpResponse::Created().json(contract),
        Err(e) => engine_error(e),
    }
}

/// GET /api/contracts — list contracts where any of the authenticated
/// user's profiles is a party.
pub async fn get_contracts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match contract_engine::list_contracts_for_user(db.get_ref(), user.0.id).await {
        Ok(contracts) => HttpResponse::Ok().json(contracts),
        Err(e) => engine_error(e),
    }
}

/// GET /api/contracts/{id} — get a single contract. Parties only.
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    let contract = match contract_engine::get_contract(db.get_ref(), contract_id).await {
        Ok(c) => c,
        Err(e) => return engine_error(e),
    };

    match acting_party(db.get_ref(), &contract, user.0.id).await {
        Ok(Some(_)) => HttpResponse::Ok().json(contract),
        Ok(None) => HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only view contracts you are a party to",
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/contracts/{id} — update negotiable terms as one of the parties.
pub async fn update_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContractTerms>,
) -> impl Responder {
    let contract_id = path.into_inner();

    let party = match party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match contract_engine::update_contract(db.get_ref(), contract_id, party, body.into_inner())
        .await
    {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => engine_error(e),
    }
}

/// POST /api/contracts/{id}/sign — record the acting party's signature.
pub async fn sign_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    let party = match party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match contract_engine::sign_contract(db.get_ref(), contract_id, party).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => engine_error(e),
    }
}

/// POST /api/contracts/{id}/cancel — cancel a non-terminal contract.
pub async fn cancel_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    let party = match party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match contract_engine::cancel_contract(db.get_ref(), contract_id, party).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => engine_error(e),
    }
}

/// POST /api/contracts/{id}/complete — mark a signed, fully performed
/// contract as completed. Restricted to the parties; the engine call itself
/// is administrative.
pub async fn complete_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    if let Err(resp) = party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        return resp;
    }

    match contract_engine::complete_contract(db.get_ref(), contract_id).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => engine_error(e),
    }
}

/// DELETE /api/contracts/{id} — soft-delete a contract, keeping the row
/// for financial history. Parties only.
pub async fn delete_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    if let Err(resp) = party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        return resp;
    }

    match contract_engine::delete_contract(db.get_ref(), contract_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Contract {contract_id} deleted"),
        })),
        Err(e) => engine_error(e),
    }
}

/// GET /api/contracts/{id}/events — the contract's schedule. Parties only.
pub async fn get_contract_events(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let contract_id = path.into_inner();

    if let Err(resp) = party_for_contract(db.get_ref(), contract_id, user.0.id).await {
        return resp;
    }

    match event_engine::list_events(db.get_ref(), contract_id).await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => engine_error(e),
    }
}

// ── Request DTOs ──

/// Request body for POST /api/contracts. The offeror profile must belong to
/// the authenticated user.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateContractRequest {
    pub offeror_profile_id: Uuid,
    pub name: String,
    pub offeree_id: Uuid,
    pub currency_code: String,
    pub upon_signing: i64,
    pub upon_completion: i64,
    pub payment_method: String,
}
