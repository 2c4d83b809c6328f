use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::{dto::CreateUserRequest, repo_types::User};
use crate::{error::ApiError, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.repo.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::Internal(e.to_string())
    })?;
    Ok(Json(users))
}

/// GET /users/:id. A segment that is not an integer names no user.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let Ok(id) = raw_id.parse::<i64>() else {
        warn!(%raw_id, "non-integer user id");
        return Err(ApiError::NotFound);
    };

    match state.repo.find_by_id(id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, user_id = id, "get user failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = match payload {
        Ok(Json(body)) => CreateUserRequest::from_json(body).and_then(|req| req.into_new_user()),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable create body");
            None
        }
    }
    .ok_or_else(|| {
        warn!("create user missing required fields");
        ApiError::InvalidInput
    })?;

    let user = state.repo.create(new_user).await.map_err(|e| {
        error!(error = %e, "create user rolled back");
        ApiError::Persistence(e.to_string())
    })?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{}", user.id))],
        Json(user),
    ))
}
