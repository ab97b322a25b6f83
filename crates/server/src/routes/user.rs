use axum::{http::StatusCode, Json};
use chrono::Utc;
use rusqlite::Connection;
use shared::{
    api::{error::ServerError, payloads::IsAdminResponse, response_errors::RegisterError},
    model::{is_unique_violation, NewUser, User, ValidateModel},
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, UserState};

fn register(conn: &mut Connection, new_user: NewUser) -> Result<User, ServerError<RegisterError>> {
    if User::fetch_by_username(conn, &new_user.username)?.is_some() {
        return Err(RegisterError::UsernameUnavailable.into());
    }

    match User::create(conn, new_user, Utc::now()) {
        Ok(user) => Ok(user),
        // Lost a race with another registration for the same name
        Err(e) if is_unique_violation(&e) => Err(RegisterError::UsernameUnavailable.into()),
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(conn))]
pub async fn create_user(
    DatabaseConnection(conn): DatabaseConnection,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ServerError<RegisterError>> {
    new_user.validate()?;

    let user = conn
        .interact(move |conn| register(conn, new_user))
        .await??;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn fetch_user(user_state: UserState) -> Json<User> {
    Json(user_state.user)
}

/// Anonymous callers aren't admins
pub async fn is_admin(user_state: Option<UserState>) -> Json<IsAdminResponse> {
    Json(IsAdminResponse {
        is_admin: user_state.is_some_and(|u| u.user.is_admin),
    })
}
