use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use clap::Parser;
use deadpool_sqlite::Pool;
use serde_json::{json, Value};
use server::{cli::Cli, db, routes, AppState};
use shared::{
    api::{Object, USER_ID_HEADER},
    model::User,
    types::UserId,
};
use tempfile::TempDir;
use tokio_test::assert_ok;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    pool: Pool,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let connection_string = path.to_str().unwrap().to_string();

        assert_ok!(db::run_migrations(&connection_string));
        let pool = db::create_pool(&connection_string).unwrap();
        let args = Cli::parse_from(["server", "--sqlite-connection-string", &connection_string]);
        let router = routes::router(AppState::new(pool.clone(), args)).unwrap();

        Self {
            router,
            pool,
            _dir: dir,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    async fn register(&self, username: &str) -> UserId {
        let (status, body) = self
            .send(
                Method::POST,
                Object::User.path(),
                None,
                Some(json!({ "username": username })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        serde_json::from_value(body["id"].clone()).unwrap()
    }

    async fn register_admin(&self, username: &str) -> UserId {
        let id = self.register(username).await;
        let conn = self.pool.get().await.unwrap();
        let promoted = conn
            .interact(move |conn| User::promote_to_admin(conn, &id))
            .await
            .unwrap()
            .unwrap();
        assert!(promoted);
        id
    }

    async fn create_exercise(&self, admin: &UserId, name: &str, muscle_group: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                Object::Exercise.path(),
                Some(admin),
                Some(json!({ "name": name, "muscle_group": muscle_group })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn ping_responds() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, Object::Ping.path(), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("pong"));
}

#[tokio::test]
async fn requests_check_out_a_migrated_connection() {
    let app = TestApp::new().await;
    let (mut parts, _) = Request::new(()).into_parts();

    let conn = assert_ok!(db::DatabaseConnection::from_request_parts(&mut parts, &app.pool).await);
    let plans = conn
        .interact(|conn| {
            conn.query_row("SELECT count(*) FROM workout_plan", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(plans, 0);
    assert_eq!(app.pool.status().size, 1);
}

#[tokio::test]
async fn usernames_are_unique() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            Object::User.path(),
            None,
            Some(json!({ "username": "alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Inner"]["inner"], json!("UsernameUnavailable"));

    let (status, body) = app
        .send(Method::GET, Object::User.path(), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn identity_is_required() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(Method::GET, Object::WorkoutPlan.path(), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::GET,
            Object::WorkoutPlan.path(),
            Some(&UserId::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::GET, Object::IsAdmin.path(), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "is_admin": false }));
}

#[tokio::test]
async fn only_admins_change_the_catalog() {
    let app = TestApp::new().await;
    let alice = app.register("alice").await;
    let admin = app.register_admin("coach").await;

    let (status, _) = app
        .send(
            Method::POST,
            Object::Exercise.path(),
            Some(&alice),
            Some(json!({ "name": "Squat", "muscle_group": "Legs" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app
        .send(Method::GET, Object::IsAdmin.path(), Some(&admin), None)
        .await;
    assert_eq!(body, json!({ "is_admin": true }));

    let squat = app.create_exercise(&admin, "Squat", "Legs").await;

    let (status, body) = app
        .send(
            Method::POST,
            Object::Exercise.path(),
            Some(&admin),
            Some(json!({ "name": "Squat", "muscle_group": "Legs" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["Inner"]["inner"],
        json!({ "NameUnavailable": { "name": "Squat" } })
    );

    let (status, body) = app
        .send(Method::GET, Object::Exercise.path(), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(
            Method::DELETE,
            &Object::ExerciseId.id_path(&squat),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn plans_are_upserted_per_exercise() {
    let app = TestApp::new().await;
    let admin = app.register_admin("coach").await;
    let alice = app.register("alice").await;
    let squat = app.create_exercise(&admin, "Squat", "Legs").await;

    let (status, created) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&alice),
            Some(json!({ "exercise": squat, "start_date": "2024-01-01", "frequency_days": 7 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["exercise_name"], "Squat");
    assert_eq!(created["exercise_muscle_group"], "Legs");
    assert_eq!(created["is_active"], true);
    assert_eq!(created["next_dates"][1], "2024-01-08");

    let (status, merged) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&alice),
            Some(json!({ "exercise": squat, "start_date": "2024-02-01", "frequency_days": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{merged}");
    assert_eq!(merged["id"], created["id"]);
    assert_eq!(merged["created_at"], created["created_at"]);
    assert_eq!(merged["start_date"], "2024-02-01");

    let (status, list) = app
        .send(Method::GET, Object::WorkoutPlan.path(), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["frequency_days"], 3);

    let plan_id = created["id"].as_str().unwrap();
    let (status, occurrences) = app
        .send(
            Method::GET,
            &format!(
                "{}?count=5",
                Object::WorkoutPlanOccurrences.id_path(plan_id)
            ),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        occurrences["dates"],
        json!(["2024-02-01", "2024-02-04", "2024-02-07", "2024-02-10", "2024-02-13"])
    );
}

#[tokio::test]
async fn default_occurrences_and_horizon() {
    let app = TestApp::new().await;
    let admin = app.register_admin("coach").await;
    let plank = app.create_exercise(&admin, "Plank", "Core").await;

    let (_, plan) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": plank, "start_date": "2024-01-01", "frequency_days": 400 })),
        )
        .await;
    assert_eq!(plan["next_dates"], json!(["2024-01-01"]));

    let (_, daily) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": plank, "frequency_days": 1 })),
        )
        .await;
    assert_eq!(daily["next_dates"].as_array().unwrap().len(), 366);

    let plan_id = plan["id"].as_str().unwrap();
    let (_, occurrences) = app
        .send(
            Method::GET,
            &Object::WorkoutPlanOccurrences.id_path(plan_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(occurrences["dates"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn invalid_plans_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.register_admin("coach").await;
    let squat = app.create_exercise(&admin, "Squat", "Legs").await;

    let (status, body) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": squat, "start_date": "2024-01-01", "frequency_days": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["Validation"]["inner"]["error_messages"].is_array());

    let (status, _) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": squat, "start_date": "2024-13-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": UserId::new_v4(), "start_date": "2024-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&admin),
            Some(json!({ "exercise": squat })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app
        .send(Method::GET, Object::WorkoutPlan.path(), Some(&admin), None)
        .await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn plans_are_private_and_deactivatable() {
    let app = TestApp::new().await;
    let admin = app.register_admin("coach").await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let squat = app.create_exercise(&admin, "Squat", "Legs").await;

    let (_, plan) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&alice),
            Some(json!({ "exercise": squat, "start_date": "2024-01-01" })),
        )
        .await;
    let plan_path = Object::WorkoutPlanId.id_path(plan["id"].as_str().unwrap());

    let (status, _) = app.send(Method::GET, &plan_path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send(Method::DELETE, &plan_path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::POST,
            Object::WorkoutPlan.path(),
            Some(&alice),
            Some(json!({ "exercise": squat, "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, &plan_path, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = app
        .send(Method::GET, Object::WorkoutPlan.path(), Some(&alice), None)
        .await;
    assert_eq!(list, json!([]));

    let (status, _) = app
        .send(Method::DELETE, &plan_path, Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn workouts_track_sets_and_muscles() {
    let app = TestApp::new().await;
    let admin = app.register_admin("coach").await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let squat = app.create_exercise(&admin, "Squat", "Legs").await;
    let curl = app.create_exercise(&admin, "Curl", "Arms").await;

    let (status, workout) = app
        .send(
            Method::POST,
            Object::Workout.path(),
            Some(&alice),
            Some(json!({
                "name": "Leg day",
                "sets": [
                    { "exercise": squat, "repetitions": 5, "weight": 100.0 },
                    { "exercise": squat, "repetitions": 5, "weight": 105.0 },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{workout}");
    assert_eq!(workout["muscles_involved"], json!(["Legs"]));
    assert_eq!(workout["sets"].as_array().unwrap().len(), 2);

    let workout_path = Object::WorkoutId.id_path(workout["id"].as_str().unwrap());
    let (status, updated) = app
        .send(
            Method::PUT,
            &workout_path,
            Some(&alice),
            Some(json!({ "sets": [{ "exercise": curl, "repetitions": 12, "weight": 15.0 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Leg day");
    assert_eq!(updated["sets"].as_array().unwrap().len(), 3);
    assert_eq!(updated["muscles_involved"], json!(["Arms", "Legs"]));

    let (status, _) = app.send(Method::GET, &workout_path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, bobs) = app
        .send(Method::GET, Object::Workout.path(), Some(&bob), None)
        .await;
    assert_eq!(bobs, json!([]));

    let (status, _) = app
        .send(
            Method::POST,
            Object::Workout.path(),
            Some(&alice),
            Some(json!({ "sets": [{ "exercise": squat, "repetitions": -1, "weight": 10.0 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::DELETE, &workout_path, Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
