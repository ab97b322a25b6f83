use axum::{extract::Path, http::StatusCode, Json};
use rusqlite::Connection;
use shared::{
    api::{
        error::ServerError,
        response_errors::{ExerciseError, FetchError},
    },
    model::{is_unique_violation, Exercise, NewExercise, ValidateModel},
    types::ExerciseId,
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, AdminUser};

/// Fails if an exercise other than `id` already uses `name`
fn check_name_available(
    conn: &Connection,
    name: &str,
    id: Option<&ExerciseId>,
) -> Result<(), ServerError<ExerciseError>> {
    match Exercise::fetch_by_name(conn, name)? {
        Some(existing) if Some(&existing.id) != id => Err(ExerciseError::NameUnavailable {
            name: name.to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

fn map_write_error(err: rusqlite::Error, name: &str) -> ServerError<ExerciseError> {
    if is_unique_violation(&err) {
        ExerciseError::NameUnavailable {
            name: name.to_string(),
        }
        .into()
    } else {
        err.into()
    }
}

fn create(conn: &Connection, new_exercise: NewExercise) -> Result<Exercise, ServerError<ExerciseError>> {
    check_name_available(conn, &new_exercise.name, None)?;
    let name = new_exercise.name.clone();
    Exercise::create(conn, new_exercise).map_err(|e| map_write_error(e, &name))
}

fn update(conn: &Connection, exercise: Exercise) -> Result<Exercise, ServerError<ExerciseError>> {
    check_name_available(conn, &exercise.name, Some(&exercise.id))?;
    match exercise.update(conn) {
        Ok(true) => Ok(exercise),
        Ok(false) => Err(ServerError::not_found(format!("Exercise {}", exercise.id))),
        Err(e) => Err(map_write_error(e, &exercise.name)),
    }
}

#[instrument(skip(conn))]
pub async fn list_exercises(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<Exercise>>, ServerError<FetchError>> {
    let exercises = conn.interact(|conn| Exercise::fetch_all(conn)).await??;
    Ok(Json(exercises))
}

#[instrument(skip(conn))]
pub async fn fetch_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    Path(id): Path<ExerciseId>,
) -> Result<Json<Exercise>, ServerError<FetchError>> {
    match conn
        .interact(move |conn| Exercise::fetch_by_id(conn, &id))
        .await??
    {
        Some(exercise) => Ok(Json(exercise)),
        None => Err(ServerError::not_found(format!("Exercise {id}"))),
    }
}

#[instrument(skip(conn))]
pub async fn create_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    AdminUser(admin): AdminUser,
    Json(new_exercise): Json<NewExercise>,
) -> Result<(StatusCode, Json<Exercise>), ServerError<ExerciseError>> {
    new_exercise.validate()?;

    let exercise = conn
        .interact(move |conn| create(conn, new_exercise))
        .await??;

    info!("{} added exercise {}", admin.user.username, exercise.name);
    Ok((StatusCode::CREATED, Json(exercise)))
}

/// Replaces every field of the exercise
#[instrument(skip(conn))]
pub async fn update_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    AdminUser(admin): AdminUser,
    Path(id): Path<ExerciseId>,
    Json(new_exercise): Json<NewExercise>,
) -> Result<Json<Exercise>, ServerError<ExerciseError>> {
    new_exercise.validate()?;

    let exercise = conn
        .interact(move |conn| update(conn, new_exercise.into_exercise(id)))
        .await??;

    info!("{} updated exercise {}", admin.user.username, exercise.id);
    Ok(Json(exercise))
}

#[instrument(skip(conn))]
pub async fn delete_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    AdminUser(admin): AdminUser,
    Path(id): Path<ExerciseId>,
) -> Result<StatusCode, ServerError<FetchError>> {
    let deleted = conn
        .interact(move |conn| Exercise::delete(conn, &id))
        .await??;

    if !deleted {
        return Err(ServerError::not_found(format!("Exercise {id}")));
    }
    info!("{} deleted exercise {id}", admin.user.username);
    Ok(StatusCode::NO_CONTENT)
}
