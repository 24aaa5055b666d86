use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::engine::events as event_engine;
use crate::handlers::{engine_error, party_for_contract};
use crate::models::events::{CreateEvent, UpdateEvent};

/// POST /api/events — schedule an event on a contract the authenticated
/// user is a party to.
pub async fn create_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateEvent>,
) -> impl Responder {
    let input = body.into_inner();

    let party = match party_for_contract(db.get_ref(), input.contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match event_engine::add_event(db.get_ref(), party, input).await {
        Ok(event) => HttpResponse::Created().json(event),
        Err(e) => engine_error(e),
    }
}

/// GET /api/events/{id} — get a single event. Parties only.
pub async fn get_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let event_id = path.into_inner();

    let event = match event_engine::get_event(db.get_ref(), event_id).await {
        Ok(ev) => ev,
        Err(e) => return engine_error(e),
    };

    match party_for_contract(db.get_ref(), event.contract_id, user.0.id).await {
        Ok(_) => HttpResponse::Ok().json(event),
        Err(resp) => resp,
    }
}

/// PUT /api/events/{id} — edit an event while its contract is still live.
pub async fn update_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateEvent>,
) -> impl Responder {
    let event_id = path.into_inner();

    let event = match event_engine::get_event(db.get_ref(), event_id).await {
        Ok(ev) => ev,
        Err(e) => return engine_error(e),
    };
    let party = match party_for_contract(db.get_ref(), event.contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match event_engine::update_event(db.get_ref(), event_id, party, body.into_inner()).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => engine_error(e),
    }
}

/// DELETE /api/events/{id} — remove an event from a Draft contract.
pub async fn delete_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let event_id = path.into_inner();

    let event = match event_engine::get_event(db.get_ref(), event_id).await {
        Ok(ev) => ev,
        Err(e) => return engine_error(e),
    };
    let party = match party_for_contract(db.get_ref(), event.contract_id, user.0.id).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match event_engine::remove_event(db.get_ref(), event_id, party).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Event {event_id} removed"),
        })),
        Err(e) => engine_error(e),
    }
}
