use actix_web::{test, web, App};
use serde_json::{json, Value};

use drivelog_api::auth::password::PasswordHasher;
use drivelog_api::auth::token::TokenService;
use drivelog_api::db::{LogStore, UserStore};

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(TokenService::new("test-secret", 3600)))
                .app_data(web::Data::new(PasswordHasher::new("test-pepper")))
                .app_data(web::Data::new(UserStore::default()))
                .app_data(web::Data::new(LogStore::default()))
                .configure(drivelog_api::routes),
        )
        .await
    };
}

fn register_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "password123",
        "name": "Test Learner",
        "birthdate": "2008-03-14",
    })
}

macro_rules! register {
    ($app:expr, $username:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body($username, $email))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        (
            body["data"]["user"]["user_id"].as_i64().unwrap(),
            body["data"]["token"].as_str().unwrap().to_owned(),
        )
    }};
}

#[actix_web::test]
async fn register_returns_token_and_sanitized_user() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("alice", "alice@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[actix_web::test]
async fn register_rejects_duplicates_and_weak_passwords() {
    let app = test_app!();
    register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("alice", "other@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Username already exists");

    let mut short = register_body("bob", "bob@example.com");
    short["password"] = json!("short");
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(short)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Password must be at least 8 characters");
}

#[actix_web::test]
async fn login_failure_is_uniform_for_unknown_user_and_bad_password() {
    let app = test_app!();
    register!(app, "alice", "alice@example.com");

    for payload in [
        json!({"username": "alice", "password": "wrong-password"}),
        json!({"username": "nobody", "password": "password123"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid credentials");
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["token"].is_string());
}

#[actix_web::test]
async fn verify_endpoint_reports_token_subject() {
    let app = test_app!();
    let (user_id, token) = register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["user_id"], user_id);
    assert_eq!(body["data"]["username"], "alice");

    let req = test::TestRequest::post().uri("/api/auth/verify").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/logs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/logs")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn log_crud_with_stats_and_ownership() {
    let app = test_app!();
    let (_, alice) = register!(app, "alice", "alice@example.com");
    let (_, mallory) = register!(app, "mallory", "mallory@example.com");

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .set_json(json!({
            "start_time": "2024-05-01T08:00:00",
            "end_time": "2024-05-01T09:30:00",
            "description": "Highway merging practice",
            "is_nighttime": false,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let log_id = body["data"]["log_id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/logs")
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["logs"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["stats"]["total_driving_minutes"], 90);
    assert_eq!(body["data"]["stats"]["total_driving_hours"], 1.5);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    // Another user cannot read, update, or delete it.
    let uri = format!("/api/logs/{log_id}");
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {mallory}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .set_json(json!({"description": "Night driving", "is_nighttime": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["is_nighttime"], true);
    assert_eq!(body["data"]["start_time"], "2024-05-01T08:00:00");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn create_log_rejects_inverted_time_range() {
    let app = test_app!();
    let (_, token) = register!(app, "alice", "alice@example.com");

    let req = test::TestRequest::post()
        .uri("/api/logs")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "start_time": "2024-05-01T10:00:00",
            "end_time": "2024-05-01T09:00:00",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "End time must be after start time");
}

#[actix_web::test]
async fn users_can_only_touch_their_own_profile() {
    let app = test_app!();
    let (alice_id, alice) = register!(app, "alice", "alice@example.com");
    let (_, mallory) = register!(app, "mallory", "mallory@example.com");

    let uri = format!("/api/users/{alice_id}");
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {mallory}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "alice@example.com");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {alice}")))
        .set_json(json!({"name": "Alice A.", "email": "mallory@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already exists");
}

#[actix_web::test]
async fn password_change_requires_current_password() {
    let app = test_app!();
    let (alice_id, token) = register!(app, "alice", "alice@example.com");

    let uri = format!("/api/users/{alice_id}/password");
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "current_password": "wrong-password",
            "new_password": "new-password-456",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Current password is incorrect");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({
            "current_password": "password123",
            "new_password": "new-password-456",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    for (password, expected) in [("password123", 401), ("new-password-456", 200)] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "alice", "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn health_does_not_require_authentication() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "ok");
}
