pub mod accommodations;
pub mod auth;
pub mod contracts;
pub mod events;
pub mod profiles;
pub mod users;

use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::db::profiles as profile_db;
use crate::engine::EngineError;
use crate::engine::contracts as contract_engine;
use crate::models::contracts as contract_models;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User routes (all protected — require valid JWT) ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::deactivate_user)),
    );

    // ── Profile routes (all protected — require valid JWT) ──
    cfg.service(
        web::resource("/profiles")
            .route(web::get().to(profiles::get_profiles))
            .route(web::post().to(profiles::create_profile)),
    );
    cfg.service(
        web::resource("/profiles/{id}")
            .route(web::get().to(profiles::get_profile))
            .route(web::put().to(profiles::update_profile))
            .route(web::delete().to(profiles::delete_profile)),
    );
    cfg.service(
        web::resource("/profiles/user/{user_id}")
            .route(web::get().to(profiles::get_profiles_by_user)),
    );

    // ── Contract routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(contracts::get_contracts))
            .route("", web::post().to(contracts::create_contract))
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}", web::put().to(contracts::update_contract))
            .route("/{id}", web::delete().to(contracts::delete_contract))
            .route("/{id}/sign", web::post().to(contracts::sign_contract))
            .route("/{id}/cancel", web::post().to(contracts::cancel_contract))
            .route("/{id}/complete", web::post().to(contracts::complete_contract))
            .route("/{id}/events", web::get().to(contracts::get_contract_events)),
    );

    // ── Event + accommodation routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(events::create_event))
            .route("/{id}", web::get().to(events::get_event))
            .route("/{id}", web::put().to(events::update_event))
            .route("/{id}", web::delete().to(events::delete_event))
            .route(
                "/{id}/accommodation",
                web::put().to(accommodations::attach_accommodation),
            )
            .route(
                "/{id}/accommodation",
                web::get().to(accommodations::get_accommodation),
            )
            .route(
                "/{id}/accommodation",
                web::delete().to(accommodations::detach_accommodation),
            ),
    );
}

/// Map an engine failure to an HTTP response. The engine never formats
/// user-facing text beyond its error `Display`; the status mapping lives
/// here.
pub(crate) fn engine_error(e: EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::NotFound { .. } => HttpResponse::NotFound().json(body),
        EngineError::InvalidParty(_)
        | EngineError::InvalidPaymentTerms(_)
        | EngineError::InvalidTimeRange(_) => HttpResponse::UnprocessableEntity().json(body),
        EngineError::InvalidState { .. } => HttpResponse::Conflict().json(body),
        EngineError::Unauthorized(_) => HttpResponse::Forbidden().json(body),
        EngineError::Unavailable(_) => HttpResponse::ServiceUnavailable().json(body),
    }
}

/// Which of the contract's two party profiles belongs to this user, if any.
///
/// Handlers use this to turn the authenticated user into the explicit actor
/// identity the engine operations expect.
pub(crate) async fn acting_party(
    db: &DatabaseConnection,
    contract: &contract_models::Model,
    user_id: Uuid,
) -> Result<Option<Uuid>, DbErr> {
    if profile_db::profile_owned_by(db, contract.offeror_id, user_id).await? {
        return Ok(Some(contract.offeror_id));
    }
    if profile_db::profile_owned_by(db, contract.offeree_id, user_id).await? {
        return Ok(Some(contract.offeree_id));
    }
    Ok(None)
}

/// Resolve which of the contract's party profiles the user owns, or build
/// the error response to return instead.
pub(crate) async fn party_for_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
    user_id: Uuid,
) -> Result<Uuid, HttpResponse> {
    let contract = contract_engine::get_contract(db, contract_id)
        .await
        .map_err(engine_error)?;

    match acting_party(db, &contract, user_id).await {
        Ok(Some(party)) => Ok(party),
        Ok(None) => Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You are not a party to this contract",
        }))),
        Err(e) => Err(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        }))),
    }
}
