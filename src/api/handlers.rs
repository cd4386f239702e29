// Exercise tracker API handlers module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::types::{self, CreateUserRequest, ExerciseResponse, LogResponse, UserResponse};
use crate::config::AppState;
use crate::domain::AppError;
use crate::http::{build_json_response, Fields};

/// POST /api/users
pub async fn create_user(
    fields: &Fields,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let request = CreateUserRequest::from_fields(fields)?;
    let user = state.users.create_user(request.username).await?;
    Ok(build_json_response(StatusCode::OK, &UserResponse::from(user)))
}

/// GET /api/users
pub async fn list_users(state: &AppState) -> Result<Response<Full<Bytes>>, AppError> {
    let users: Vec<UserResponse> = state
        .users
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(build_json_response(StatusCode::OK, &users))
}

/// POST /api/users/:id/exercises
pub async fn create_exercise(
    user_id: String,
    fields: &Fields,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let input = types::new_exercise(user_id, fields)?;
    let logged = state.exercises.create_exercise(input).await?;
    Ok(build_json_response(
        StatusCode::OK,
        &ExerciseResponse::from(logged),
    ))
}

/// GET /api/users/:id/logs
pub async fn get_logs(
    user_id: &str,
    query: &Fields,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let query = types::log_query(query)?;
    let log = state.logs.get_logs(user_id, query).await?;
    Ok(build_json_response(StatusCode::OK, &LogResponse::from(log)))
}
