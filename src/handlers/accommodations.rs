use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::engine::accommodations as accommodation_engine;
use crate::engine::events as event_engine;
use crate::handlers::{engine_error, party_for_contract};
use crate::models::accommodations::AttachAccommodation;

/// PUT /api/events/{id}/accommodation — attach (or replace) lodging
/// details on an event. Parties only.
pub async fn attach_accommodation(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AttachAccommodation>,
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

    match accommodation_engine::attach_accommodation(
        db.get_ref(),
        event_id,
        party,
        body.into_inner(),
    )
    .await
    {
        Ok(accommodation) => HttpResponse::Ok().json(accommodation),
        Err(e) => engine_error(e),
    }
}

/// GET /api/events/{id}/accommodation — the lodging attached to an event.
pub async fn get_accommodation(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let event_id = path.into_inner();

    let event = match event_engine::get_event(db.get_ref(), event_id).await {
        Ok(ev) => ev,
        Err(e) => return engine_error(e),
    };
    if let Err(resp) = party_for_contract(db.get_ref(), event.contract_id, user.0.id).await {
        return resp;
    }

    match accommodation_engine::get_accommodation(db.get_ref(), event_id).await {
        Ok(accommodation) => HttpResponse::Ok().json(accommodation),
        Err(e) => engine_error(e),
    }
}

/// DELETE /api/events/{id}/accommodation — detach lodging from an event.
pub async fn detach_accommodation(
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

    match accommodation_engine::remove_accommodation(db.get_ref(), event_id, party).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Accommodation for event {event_id} removed"),
        })),
        Err(e) => engine_error(e),
    }
}
