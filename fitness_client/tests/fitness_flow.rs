mod support;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use fitness_client::domain::{Credentials, GoalDraft, WorkoutDraft};
use fitness_client::interface_adapters::InMemoryTokenStore;
use fitness_client::{ApiError, FitnessApp, RetryPolicy};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const TOKEN: &str = "jwt-abc";

// Minimal stand-in for the fitness backend: one account, token-guarded resources.
#[derive(Clone, Default)]
struct Backend {
    workouts: Arc<Mutex<Vec<Value>>>,
    // When set, every guarded route answers 401 as if the token expired.
    expired: Arc<Mutex<bool>>,
}

type Reply = (StatusCode, Json<Value>);

fn authorized(backend: &Backend, headers: &HeaderMap) -> bool {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let expected = format!("Bearer {TOKEN}");
    let expired = *backend.expired.lock().expect("expired mutex poisoned");
    !expired && bearer == Some(expected.as_str())
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "invalid session token" })),
    )
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] != "password123" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "token": TOKEN, "user": { "username": body["username"], "id": 1 } })),
    )
}

async fn register(Json(body): Json<Value>) -> Reply {
    (
        StatusCode::CREATED,
        Json(json!({ "token": TOKEN, "user": { "username": body["username"], "id": 2 } })),
    )
}

async fn list_goals(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([{ "id": 1, "title": "Run 5k", "target": 5, "progress": 2, "unit": "km" }])),
    )
}

async fn create_goal(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let mut goal = body;
    goal["id"] = json!(2);
    (StatusCode::CREATED, Json(goal))
}

async fn update_goal(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let mut goal = body;
    goal["id"] = json!(id);
    (StatusCode::OK, Json(goal))
}

async fn list_workouts(State(backend): State<Backend>, headers: HeaderMap) -> Reply {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let workouts = backend.workouts.lock().expect("workouts mutex poisoned");
    (StatusCode::OK, Json(Value::Array(workouts.clone())))
}

async fn create_workout(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let mut workouts = backend.workouts.lock().expect("workouts mutex poisoned");
    let mut workout = body;
    workout["id"] = json!(workouts.len() as u64 + 1);
    workouts.push(workout.clone());
    (StatusCode::CREATED, Json(workout))
}

async fn delete_workout(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> StatusCode {
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut workouts = backend.workouts.lock().expect("workouts mutex poisoned");
    workouts.retain(|workout| workout["id"] != json!(id));
    StatusCode::NO_CONTENT
}

async fn list_posts() -> Json<Value> {
    Json(json!([{ "id": 1, "author": "ana", "content": "Leg day", "createdAt": "2024-01-02" }]))
}

async fn progress() -> Json<Value> {
    Json(json!([
        { "date": "2024-01-01", "workouts": 1 },
        { "date": "2024-01-02", "workouts": 2 }
    ]))
}

async fn spawn(backend: Backend) -> FitnessApp {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/{id}", put(update_goal))
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/{id}", axum::routing::delete(delete_workout))
        .route("/api/posts", get(list_posts))
        .route("/api/progress", get(progress))
        .with_state(backend);
    let base_url = support::spawn_backend(app).await;
    let store = InMemoryTokenStore::new();
    FitnessApp::new(support::client(&base_url, &store, support::fast_retry()))
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        username: "testuser".to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn when_user_logs_in_then_guarded_resources_are_reachable_until_logout() {
    let app = spawn(Backend::default()).await;

    let user = app
        .auth
        .login(&credentials("password123"))
        .await
        .expect("expected login to succeed");
    assert_eq!(user.username, "testuser");
    assert!(app.auth.is_authenticated().await);

    let goals = app.goals.list().await.expect("expected goals");
    assert_eq!(goals[0].title, "Run 5k");
    assert_eq!(goals[0].progress, 2.0);

    app.auth.logout().await.expect("expected logout to succeed");
    assert!(!app.auth.is_authenticated().await);

    let result = app.goals.list().await;
    assert_eq!(result, Err(ApiError::Unauthorized));
}

#[tokio::test]
async fn when_login_is_rejected_then_message_is_unauthorized_and_no_token_is_kept() {
    let app = spawn(Backend::default()).await;

    let result = app.auth.login(&credentials("wrong")).await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(!app.auth.is_authenticated().await);
    assert!(!app.auth.has_stored_token().await);
}

#[tokio::test]
async fn when_user_registers_then_token_is_stored() {
    let app = spawn(Backend::default()).await;

    let user = app
        .auth
        .register(&credentials("anything"))
        .await
        .expect("expected registration to succeed");

    assert_eq!(user.extra["id"], 2);
    assert!(app.auth.has_stored_token().await);
}

#[tokio::test]
async fn when_goals_are_created_and_updated_then_backend_echoes_trimmed_fields() {
    let app = spawn(Backend::default()).await;
    app.auth
        .login(&credentials("password123"))
        .await
        .expect("expected login to succeed");
    let draft = GoalDraft {
        title: " Swim ".to_string(),
        description: "".to_string(),
        target: 20.0,
        unit: " laps ".to_string(),
    };

    let created = app.goals.create(draft.clone()).await.expect("expected goal");
    let updated = app.goals.update(7, draft).await.expect("expected goal");

    assert_eq!(created.id, 2);
    assert_eq!(created.title, "Swim");
    assert_eq!(created.unit, "laps");
    assert_eq!(updated.id, 7);
}

#[tokio::test]
async fn when_workouts_are_logged_and_deleted_then_list_reflects_changes() {
    let app = spawn(Backend::default()).await;
    app.auth
        .login(&credentials("password123"))
        .await
        .expect("expected login to succeed");

    let workout = app
        .workouts
        .create(WorkoutDraft {
            date: "2024-01-03".to_string(),
            activity: "Rowing".to_string(),
            duration: 30.0,
            calories: 280.0,
        })
        .await
        .expect("expected workout");
    assert_eq!(app.workouts.list().await.expect("list").len(), 1);

    app.workouts
        .delete(workout.id)
        .await
        .expect("expected delete to succeed");

    assert!(app.workouts.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn when_token_expires_mid_session_then_it_is_cleared_from_the_store() {
    let backend = Backend::default();
    let app = spawn(backend.clone()).await;
    app.auth
        .login(&credentials("password123"))
        .await
        .expect("expected login to succeed");
    *backend.expired.lock().expect("expired mutex poisoned") = true;

    let result = app.workouts.list().await;

    assert_eq!(result.unwrap_err().to_string(), "Unauthorized");
    assert!(!app.auth.has_stored_token().await);
    assert!(!app.auth.is_authenticated().await);
}

#[tokio::test]
async fn when_feed_and_progress_are_public_then_they_load_without_login() {
    let app = spawn(Backend::default()).await;

    let posts = app.posts.list().await.expect("expected posts");
    let chart = app.progress.chart().await.expect("expected chart");

    assert_eq!(posts[0].author, "ana");
    assert_eq!(chart.labels, vec!["2024-01-01", "2024-01-02"]);
    assert_eq!(chart.datasets[0].data, vec![1, 2]);
}
