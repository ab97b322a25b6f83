use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use shared::api::{Object, USER_ID_HEADER};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::AppState;

pub mod exercise;
pub mod ping;
pub mod user;
pub mod workout;
pub mod workout_plan;

/// Every API route with logging, CORS and body limits applied
pub fn router(state: AppState) -> Result<Router, anyhow::Error> {
    let cors = CorsLayer::new()
        .allow_origin(state.args.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);
    let body_limit = RequestBodyLimitLayer::new(state.args.request_body_limit_bytes);

    let router = Router::new()
        .route(Object::Ping.path(), get(ping::ping))
        .route(
            Object::User.path(),
            get(user::fetch_user).post(user::create_user),
        )
        .route(Object::IsAdmin.path(), get(user::is_admin))
        .route(
            Object::Exercise.path(),
            get(exercise::list_exercises).post(exercise::create_exercise),
        )
        .route(
            Object::ExerciseId.path(),
            get(exercise::fetch_exercise)
                .put(exercise::update_exercise)
                .delete(exercise::delete_exercise),
        )
        .route(
            Object::Workout.path(),
            get(workout::list_workouts).post(workout::create_workout),
        )
        .route(
            Object::WorkoutId.path(),
            get(workout::fetch_workout)
                .put(workout::update_workout)
                .delete(workout::delete_workout),
        )
        .route(
            Object::WorkoutPlan.path(),
            get(workout_plan::list_plans).post(workout_plan::upsert_plan),
        )
        .route(
            Object::WorkoutPlanId.path(),
            get(workout_plan::fetch_plan).delete(workout_plan::delete_plan),
        )
        .route(
            Object::WorkoutPlanOccurrences.path(),
            get(workout_plan::plan_occurrences),
        )
        .layer(body_limit)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    Ok(router)
}
