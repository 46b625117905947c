use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument};

use care_dashboard_domain::services::SharedDirectoryService;

use crate::entities::common::ErrorBody;
use crate::entities::{User, Vhv};

/// Body returned when listing users fails
pub const USERS_ERROR: &str = "Failed to get users";

/// Body returned when listing volunteers fails
pub const VHVS_ERROR: &str = "Failed to get VHVs";

fn internal_error(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}

/// List every user in the directory
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Directory unavailable", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "admin"
)]
#[instrument(skip(service))]
pub async fn get_users(
    State(service): State<SharedDirectoryService>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching users from {} directory", service.backend_name());

    match service.get_users().await {
        Ok(users) => {
            info!("Fetched {} users", users.len());
            Ok((StatusCode::OK, Json(users)))
        },
        Err(e) => {
            error!("Error fetching users: {}", e);
            Err(internal_error(USERS_ERROR))
        }
    }
}

/// List every village health volunteer in the directory
#[utoipa::path(
    get,
    path = "/api/admin/vhvs",
    responses(
        (status = 200, description = "All village health volunteers", body = [Vhv]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Directory unavailable", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "admin"
)]
#[instrument(skip(service))]
pub async fn get_vhvs(
    State(service): State<SharedDirectoryService>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching VHVs from {} directory", service.backend_name());

    match service.get_vhvs().await {
        Ok(vhvs) => {
            info!("Fetched {} VHVs", vhvs.len());
            Ok((StatusCode::OK, Json(vhvs)))
        },
        Err(e) => {
            error!("Error fetching VHVs: {}", e);
            Err(internal_error(VHVS_ERROR))
        }
    }
}
