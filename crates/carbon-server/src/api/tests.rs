use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, persistence, state::AppState};

async fn setup_with(configure: impl FnOnce(&mut Config)) -> (Router, Arc<AppState>) {
    let mut config = Config::from_env();
    config.database_path = std::env::temp_dir()
        .join(format!("carbon-test-{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string();
    config.database_max_connections = 1;
    config.jwt_secret = "test-secret".to_string();
    config.mapbox_access_token = String::new();
    config.search_rate_limit_rps = 100;
    configure(&mut config);

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await
        .expect("init db");
    let state = Arc::new(AppState::new(db, config.clone()).expect("state"));

    let app = api::routes(&config).with_state(state.clone());
    (app, state)
}

async fn setup_app() -> (Router, Arc<AppState>) {
    setup_with(|_| {}).await
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, email: &str) -> (String, Value) {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({
                "email": email,
                "password": "s3cret-password",
                "full_name": "Test User"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    let token = body["access_token"].as_str().expect("token").to_string();
    (token, body["user"].clone())
}

fn london_to_paris(origin_name: &str) -> Value {
    json!({
        "origin_name": origin_name,
        "origin_coordinates": { "latitude": 51.5074, "longitude": -0.1278 },
        "destination_name": "Paris, France",
        "destination_coordinates": { "latitude": 48.8566, "longitude": 2.3522 },
        "weight_kg": 1000.0
    })
}

#[tokio::test]
async fn root_and_health() {
    let (app, _state) = setup_app().await;

    let res = app.clone().oneshot(get_request("/", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["name"], "Carbon Emission Calculator");
    assert_eq!(body["health"], "/api/v1/health");

    let res = app.clone().oneshot(get_request("/api/v1/health", None)).await.unwrap();
    assert_eq!(read_json(res).await, json!({ "status": "healthy" }));

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/health/detailed", None))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], "offline");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let (app, _state) = setup_app().await;

    let req = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");

    let res = app.oneshot(get_request("/api/v1/health", None)).await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn register_login_and_me() {
    let (app, _state) = setup_app().await;
    let (token, user) = register(&app, "Ada@Example.com").await;
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["is_active"], true);
    assert!(user.get("hashed_password").is_none());

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await["id"], user["id"]);

    let form = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ada%40example.com&password=s3cret-password"))
        .unwrap();
    let res = app.clone().oneshot(form).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, _state) = setup_app().await;
    register(&app, "dup@example.com").await;

    let res = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({ "email": "DUP@example.com", "password": "another-pass", "full_name": "Other" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(res).await["detail"],
        "User with email dup@example.com already exists"
    );
}

#[tokio::test]
async fn registration_validation() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({ "email": "short@example.com", "password": "short", "full_name": "Short" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(read_json(res).await["detail"].as_str().unwrap().contains("password"));

    let res = app
        .oneshot(json_request("POST", "/api/v1/auth/register", None, json!({ "email": 5 })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(read_json(res).await["detail"].is_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _state) = setup_app().await;
    register(&app, "ada@example.com").await;

    let form = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ada%40example.com&password=nope-nope"))
        .unwrap();
    let res = app.oneshot(form).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(read_json(res).await["detail"], "Incorrect email or password");
}

#[tokio::test]
async fn protected_routes_require_valid_token() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/emissions/factors", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .oneshot(get_request("/api/v1/auth/me", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(res).await["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn inactive_user_is_rejected() {
    let (app, state) = setup_app().await;
    let (token, user) = register(&app, "gone@example.com").await;
    persistence::users::set_active(state.db().pool(), user["id"].as_str().unwrap(), false)
        .await
        .unwrap();

    let res = app
        .oneshot(get_request("/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["detail"], "Inactive user");
}

#[tokio::test]
async fn emission_endpoints() {
    let (app, _state) = setup_app().await;
    let (token, _) = register(&app, "calc@example.com").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/emissions/calculate",
            Some(&token),
            json!({ "distance_km": 1000.0, "weight_kg": 1000.0, "transport_mode": "land" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["emission_kg_co2"], 62.0);
    assert_eq!(body["transport_mode"], "land");

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/emissions/calculate",
            Some(&token),
            json!({ "distance_km": 0.0, "weight_kg": 1000.0, "transport_mode": "air" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/emissions/calculate",
            Some(&token),
            json!({ "distance_km": 10.0, "weight_kg": 10.0, "transport_mode": "rail" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/emissions/factors", Some(&token)))
        .await
        .unwrap();
    let body = read_json(res).await;
    let modes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["mode"].as_str().unwrap())
        .collect();
    assert_eq!(modes, vec!["land", "sea", "air"]);
    assert_eq!(body[0]["unit"], "kg CO2/t-km");

    let res = app
        .clone()
        .oneshot(get_request(
            "/api/v1/emissions/compare?distance_km=500&weight_kg=2000",
            Some(&token),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["most_efficient"], "sea");
    assert_eq!(body["least_efficient"], "air");

    let res = app
        .oneshot(get_request(
            "/api/v1/emissions/compare?distance_km=-1&weight_kg=2000",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn compute_routes_without_providers() {
    let (app, _state) = setup_app().await;
    let (token, _) = register(&app, "routes@example.com").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/routes/compute",
            Some(&token),
            london_to_paris("London, United Kingdom"),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;

    assert_eq!(body["origin_name"], "London, United Kingdom");
    assert_eq!(body["weight_kg"], 1000.0);
    let modes: Vec<&str> = body["detailed_routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["transport_mode"].as_str().unwrap())
        .collect();
    assert_eq!(modes, vec!["land", "sea", "air"]);
    assert_eq!(body["detailed_routes"][0]["is_viable"], true);
    assert!(!body["shortest_route"]["geometry"].as_array().unwrap().is_empty());
    assert_eq!(body["mode_comparison"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn compute_routes_rejects_invalid_request() {
    let (app, _state) = setup_app().await;
    let (token, _) = register(&app, "invalid@example.com").await;

    let mut body = london_to_paris("London");
    body["weight_kg"] = json!(0.0);
    let res = app
        .oneshot(json_request("POST", "/api/v1/routes/compute", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_lifecycle() {
    let (app, _state) = setup_app().await;
    let (token, _) = register(&app, "owner@example.com").await;
    let (other, _) = register(&app, "other@example.com").await;

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/searches",
            Some(&token),
            london_to_paris("London, United Kingdom"),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = read_json(res).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["detailed_routes"].as_array().unwrap().len(), 3);

    let res = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/searches/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stored = read_json(res).await;
    assert_eq!(stored["origin_name"], "London, United Kingdom");
    assert_eq!(stored["shortest_route"]["geometry"], json!([]));
    assert!(stored.get("detailed_routes").is_none());
    assert!(stored.get("user_id").is_none());

    let res = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/searches/{id}"), Some(&other)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/searches/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .oneshot(get_request(&format!("/api/v1/searches/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json(res).await["detail"],
        format!("Search with ID {id} not found")
    );
}

#[tokio::test]
async fn search_listing_filters_and_clear() {
    let (app, _state) = setup_app().await;
    let (token, _) = register(&app, "lister@example.com").await;

    for origin in ["London, UK", "Londonderry, UK", "Leeds, UK"] {
        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/searches", Some(&token), london_to_paris(origin)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/searches?page_size=2", Some(&token)))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["origin_name"], "Leeds, UK");
    assert_eq!(
        body["pagination"],
        json!({
            "total": 3,
            "page": 1,
            "page_size": 2,
            "total_pages": 2,
            "has_next": true,
            "has_prev": false
        })
    );

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/searches?origin_name=london", Some(&token)))
        .await
        .unwrap();
    assert_eq!(read_json(res).await["pagination"]["total"], 2);

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/searches?page_size=0", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app
        .clone()
        .oneshot(get_request("/api/v1/searches?date_from=not-a-date", Some(&token)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let clear = Request::builder()
        .method("DELETE")
        .uri("/api/v1/searches")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(clear).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await, json!({ "deleted_count": 3 }));

    let res = app
        .oneshot(get_request("/api/v1/searches", Some(&token)))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["total_pages"], 1);
}

#[tokio::test]
async fn search_creation_is_rate_limited() {
    let (app, _state) = setup_with(|config| {
        config.search_rate_limit_rps = 1;
        config.rate_limit_enabled = true;
    })
    .await;
    let (token, _) = register(&app, "busy@example.com").await;

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/searches", Some(&token), london_to_paris("London")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/searches", Some(&token), london_to_paris("London")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(read_json(second).await["detail"], "Rate limit exceeded");

    // Listing is not limited.
    let list = app
        .oneshot(get_request("/api/v1/searches", Some(&token)))
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::OK);
}
