use axum::{extract::Path, http::StatusCode, Json};
use chrono::Utc;
use shared::{
    api::{error::ServerError, payloads::WorkoutRequest, response_errors::FetchError},
    model::{Workout, WorkoutDetail},
    types::WorkoutId,
};
use tracing::{debug, instrument};

use crate::{db::DatabaseConnection, UserState};

/// The caller's workouts, newest first
#[instrument(skip(conn))]
pub async fn list_workouts(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Vec<WorkoutDetail>>, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let workouts = conn
        .interact(move |conn| WorkoutDetail::fetch_all_for_user(conn, &user_id))
        .await??;
    Ok(Json(workouts))
}

/// Workouts are always dated today
#[instrument(skip(conn))]
pub async fn create_workout(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Json(request): Json<WorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutDetail>), ServerError<FetchError>> {
    let user_id = *user_state.id();
    let today = Utc::now().date_naive();

    let workout = conn
        .interact(move |conn| Workout::create(conn, &user_id, request, today))
        .await??;

    debug!("Created workout {}", workout.workout.id);
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(conn))]
pub async fn fetch_workout(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<WorkoutId>,
) -> Result<Json<WorkoutDetail>, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let workout = conn
        .interact(move |conn| {
            Workout::fetch_for_user(conn, &user_id, &id)?
                .map(|w| WorkoutDetail::load(conn, w))
                .transpose()
        })
        .await??;

    match workout {
        Some(workout) => Ok(Json(workout)),
        None => Err(ServerError::not_found(format!("Workout {id}"))),
    }
}

/// Renames the workout if a name is given and appends the sets
#[instrument(skip(conn))]
pub async fn update_workout(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<WorkoutId>,
    Json(request): Json<WorkoutRequest>,
) -> Result<Json<WorkoutDetail>, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let workout = conn
        .interact(move |conn| Workout::update(conn, &user_id, &id, request))
        .await??;

    match workout {
        Some(workout) => Ok(Json(workout)),
        None => Err(ServerError::not_found(format!("Workout {id}"))),
    }
}

#[instrument(skip(conn))]
pub async fn delete_workout(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<WorkoutId>,
) -> Result<StatusCode, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let deleted = conn
        .interact(move |conn| Workout::delete_for_user(conn, &user_id, &id))
        .await??;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::not_found(format!("Workout {id}")))
    }
}
