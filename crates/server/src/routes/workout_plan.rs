use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared::{
    api::{
        error::ServerError,
        payloads::{OccurrencesQuery, OccurrencesResponse, UpsertPlanRequest},
        response_errors::{FetchError, PlanError},
    },
    model::{
        format_occurrences, upsert_plan_sqlite, PlanSubmission, WorkoutPlan, WorkoutPlanView,
        DEFAULT_OCCURRENCE_COUNT, PROJECTION_OCCURRENCE_COUNT,
    },
    types::PlanId,
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, UserState};

/// The caller's active plans, newest first
#[instrument(skip(conn))]
pub async fn list_plans(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Vec<WorkoutPlanView>>, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let plans = conn
        .interact(move |conn| WorkoutPlanView::fetch_all_active_for_user(conn, &user_id))
        .await??;
    Ok(Json(plans))
}

/// Creates the caller's plan for the exercise, or merges the submission into
/// the one they already have. Responds 201 only when a plan was created
#[instrument(skip(conn))]
pub async fn upsert_plan(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Json(request): Json<UpsertPlanRequest>,
) -> Result<(StatusCode, Json<WorkoutPlanView>), ServerError<PlanError>> {
    let submission = PlanSubmission::try_from(request)?;
    let user_id = *user_state.id();
    let now = Utc::now();

    let (view, created) = conn
        .interact(move |conn| {
            let upserted = upsert_plan_sqlite(conn, &user_id, submission, now)?;
            let view = WorkoutPlanView::load(conn, upserted.plan)?;
            Ok::<_, ServerError<PlanError>>((view, upserted.created))
        })
        .await??;

    let status = if created {
        info!("Created plan {}", view.plan.id);
        StatusCode::CREATED
    } else {
        info!("Updated plan {}", view.plan.id);
        StatusCode::OK
    };
    Ok((status, Json(view)))
}

#[instrument(skip(conn))]
pub async fn fetch_plan(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<PlanId>,
) -> Result<Json<WorkoutPlanView>, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let plan = conn
        .interact(move |conn| WorkoutPlanView::fetch_active_for_user(conn, &user_id, &id))
        .await??;

    match plan {
        Some(plan) => Ok(Json(plan)),
        None => Err(ServerError::not_found(format!("Workout plan {id}"))),
    }
}

/// Upcoming dates of an active plan. `count` defaults to 10 and is capped at
/// the full projection length
#[instrument(skip(conn))]
pub async fn plan_occurrences(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<PlanId>,
    Query(query): Query<OccurrencesQuery>,
) -> Result<Json<OccurrencesResponse>, ServerError<FetchError>> {
    let count = query
        .count
        .unwrap_or(DEFAULT_OCCURRENCE_COUNT)
        .min(PROJECTION_OCCURRENCE_COUNT);
    let user_id = *user_state.id();

    let plan = conn
        .interact(move |conn| WorkoutPlan::fetch_active_for_user(conn, &user_id, &id))
        .await??;

    match plan {
        Some(plan) => Ok(Json(OccurrencesResponse {
            plan_id: plan.id,
            dates: format_occurrences(plan.occurrences(count)),
        })),
        None => Err(ServerError::not_found(format!("Workout plan {id}"))),
    }
}

#[instrument(skip(conn))]
pub async fn delete_plan(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Path(id): Path<PlanId>,
) -> Result<StatusCode, ServerError<FetchError>> {
    let user_id = *user_state.id();
    let deleted = conn
        .interact(move |conn| WorkoutPlan::delete_for_user(conn, &user_id, &id))
        .await??;

    if deleted {
        info!("Deleted plan {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::not_found(format!("Workout plan {id}")))
    }
}
