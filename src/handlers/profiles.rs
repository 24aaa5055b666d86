use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::profiles as profile_db;
use crate::models::profiles::{CreateProfile, UpdateProfile};

/// Social-media and website entries must be well-formed web URLs: an
/// http(s) scheme followed by a non-empty host, no whitespace anywhere.
fn validate_urls<'a>(urls: impl IntoIterator<Item = &'a String>) -> Result<(), String> {
    for url in urls {
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        let well_formed = matches!(rest, Some(host) if !host.is_empty())
            && !url.contains(char::is_whitespace);
        if !well_formed {
            return Err(format!("'{url}' is not a valid http(s) URL"));
        }
    }
    Ok(())
}

/// GET /api/profiles — list all profiles (requires authentication).
pub async fn get_profiles(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match profile_db::get_all_profiles(db.get_ref()).await {
        Ok(profiles) => HttpResponse::Ok().json(profiles),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch profiles: {e}"),
        })),
    }
}

/// GET /api/profiles/{id} — get a single profile.
pub async fn get_profile(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match profile_db::get_profile_by_id(db.get_ref(), id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Profile {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/profiles/user/{user_id} — list profiles owned by a user.
pub async fn get_profiles_by_user(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let user_id = path.into_inner();
    match profile_db::get_profiles_by_user_id(db.get_ref(), user_id).await {
        Ok(profiles) => HttpResponse::Ok().json(profiles),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch profiles: {e}"),
        })),
    }
}

/// POST /api/profiles — create a profile owned by the authenticated user.
pub async fn create_profile(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProfile>,
) -> impl Responder {
    let input = body.into_inner();

    let urls = input
        .social_media
        .iter()
        .flatten()
        .chain(input.website.iter());
    if let Err(e) = validate_urls(urls) {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({ "error": e }));
    }

    match profile_db::insert_profile(db.get_ref(), auth_user.0.id, input).await {
        Ok(profile) => HttpResponse::Created().json(profile),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create profile: {e}"),
        })),
    }
}

/// PUT /api/profiles/{id} — update a profile (owner only).
pub async fn update_profile(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProfile>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    let urls = input
        .social_media
        .iter()
        .flatten()
        .chain(input.website.iter());
    if let Err(e) = validate_urls(urls) {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({ "error": e }));
    }

    // Verify the profile belongs to the authenticated user.
    match profile_db::get_profile_by_id(db.get_ref(), id).await {
        Ok(Some(profile)) if profile.user_id != auth_user.0.id => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "You can only update your own profiles",
            }));
        }
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Profile {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
        _ => {}
    }

    match profile_db::update_profile(db.get_ref(), id, input).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update profile: {e}"),
        })),
    }
}

/// DELETE /api/profiles/{id} — delete a profile (owner only).
pub async fn delete_profile(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    // Verify the profile belongs to the authenticated user.
    match profile_db::get_profile_by_id(db.get_ref(), id).await {
        Ok(Some(profile)) if profile.user_id != auth_user.0.id => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "You can only delete your own profiles",
            }));
        }
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Profile {id} not found"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
        _ => {}
    }

    match profile_db::delete_profile(db.get_ref(), id).await {
        Ok(result) => {
            if result.rows_affected > 0 {
                HttpResponse::Ok().json(serde_json::json!({
                    "message": format!("Profile {id} deleted"),
                }))
            } else {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Profile {id} not found"),
                }))
            }
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete profile: {e}"),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_web_urls_pass() {
        let list = urls(&[
            "https://example.com",
            "http://example.com/band",
            "https://instagram.com/the_act",
        ]);
        assert!(validate_urls(&list).is_ok());
    }

    #[test]
    fn malformed_urls_are_rejected() {
        for bad in [
            "https://",
            "http://",
            "http://example.com/a b",
            "ftp://example.com",
            "example.com",
        ] {
            let list = urls(&[bad]);
            assert!(validate_urls(&list).is_err(), "{bad} should be rejected");
        }
    }
}
