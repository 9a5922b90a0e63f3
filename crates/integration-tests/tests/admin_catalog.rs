//! Bearer-authenticated menu management against fake catalog, organization
//! and auth services.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use dine_admin::auth::{HttpAuthApi, ManualClock, MemoryStore, SessionManager, SessionStatus};
use dine_admin::{AdminClient, AdminConfig, AdminError, ItemTable};
use dine_core::{CategoryDraft, ItemId, ItemStatus, RestaurantId};
use dine_integration_tests::{
    FakeService, NOW_MS, categories_json, items_json, jwt, restaurant_json, temp_session_file,
};
use secrecy::SecretString;
use serde_json::{Value, json};

type Manager = SessionManager<HttpAuthApi, MemoryStore, ManualClock>;

#[derive(Clone, Default)]
struct Fake {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Fake {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn token_for(username: &str) -> String {
    let roles: &[&str] = if username == "root" {
        &["SUPER_ADMIN"]
    } else {
        &["ADMIN"]
    };
    jwt(NOW_MS / 1000 + 3600, roles)
}

fn authorized(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    ["owner", "root"]
        .iter()
        .any(|user| value == format!("Bearer {}", token_for(user)))
}

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({
            "accessToken": token_for(username),
            "refreshToken": "refresh-1",
            "expiresIn": 3_600_000,
        })),
    )
        .into_response()
}

async fn items(State(fake): State<Fake>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    fake.record(format!("GET items {id}"));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(items_json()).into_response()
}

async fn categories(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    fake.record(format!("GET categories {id}"));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(categories_json()).into_response()
}

async fn create_category(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    fake.record("POST categories".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": "c-desserts", "name": body["name"]})),
    )
        .into_response()
}

async fn item_status(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    fake.record(format!("PUT status {id} {}", body["enabled"]));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "i-chicken" => (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response(),
        "i-naan" => StatusCode::UNAUTHORIZED.into_response(),
        "i-paneer" | "i-lassi" => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn organizations(State(fake): State<Fake>, headers: HeaderMap) -> Response {
    fake.record("GET organizations".to_string());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([restaurant_json()])).into_response()
}

async fn start(username: &str) -> (FakeService, Fake, AdminClient, Manager) {
    let fake = Fake::default();
    let router = Router::new()
        .route("/public/api/v1/auth", post(login))
        .route("/api/v1/items/restaurant/{id}", get(items))
        .route("/api/v1/items/{id}/status", put(item_status))
        .route("/api/v1/categories/restaurant/{id}", get(categories))
        .route("/api/v1/categories", post(create_category))
        .route("/api/v1/organizations", get(organizations))
        .with_state(fake.clone());
    let service = FakeService::start(router).await;

    let config = AdminConfig::for_base_url(service.url.clone(), temp_session_file("unused"));
    let client = AdminClient::new(&config).unwrap();
    let mut manager = SessionManager::restore(
        HttpAuthApi::from_config(&config).unwrap(),
        MemoryStore::new(),
        ManualClock::new(NOW_MS),
    )
    .await
    .unwrap();
    manager
        .login(username, &SecretString::from("s3cret"))
        .await
        .unwrap();

    (service, fake, client, manager)
}

async fn load_table(client: &AdminClient, manager: &mut Manager) -> ItemTable {
    let bearer = manager.bearer().await.unwrap();
    ItemTable::load(client, &bearer, &RestaurantId::new("r-1"))
        .await
        .unwrap()
}

fn status_of(table: &ItemTable, id: &str) -> ItemStatus {
    table.item(&ItemId::new(id)).unwrap().status()
}

#[tokio::test]
async fn table_loads_items_and_categories_with_the_bearer() {
    let (_service, fake, client, mut manager) = start("owner").await;

    let table = load_table(&client, &mut manager).await;

    assert_eq!(table.items().len(), 5);
    assert_eq!(table.categories().len(), 3);
    let mut requests = fake.requests();
    requests.sort();
    assert_eq!(requests, vec!["GET categories r-1", "GET items r-1"]);
}

#[tokio::test]
async fn toggle_sends_the_new_status() {
    let (_service, fake, client, mut manager) = start("owner").await;
    let mut table = load_table(&client, &mut manager).await;

    let status = table
        .toggle(&client, &mut manager, &ItemId::new("i-paneer"))
        .await
        .unwrap();
    assert_eq!(status, ItemStatus::Disabled);
    assert_eq!(status_of(&table, "i-paneer"), ItemStatus::Disabled);

    let status = table
        .toggle(&client, &mut manager, &ItemId::new("i-lassi"))
        .await
        .unwrap();
    assert_eq!(status, ItemStatus::Enabled);

    let requests = fake.requests();
    assert!(requests.contains(&"PUT status i-paneer false".to_string()));
    assert!(requests.contains(&"PUT status i-lassi true".to_string()));
}

#[tokio::test]
async fn failed_toggle_restores_the_row() {
    let (_service, _fake, client, mut manager) = start("owner").await;
    let mut table = load_table(&client, &mut manager).await;

    let err = table
        .toggle(&client, &mut manager, &ItemId::new("i-chicken"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Status { status: 500, .. }));
    assert_eq!(status_of(&table, "i-chicken"), ItemStatus::Enabled);
    assert_eq!(manager.status(), SessionStatus::Active);
}

#[tokio::test]
async fn rejected_token_signs_the_session_out() {
    let (_service, _fake, client, mut manager) = start("owner").await;
    let mut table = load_table(&client, &mut manager).await;
    let mut status = manager.subscribe();

    let err = table
        .toggle(&client, &mut manager, &ItemId::new("i-naan"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(status_of(&table, "i-naan"), ItemStatus::Enabled);
    assert_eq!(manager.status(), SessionStatus::SignedOut);
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SessionStatus::SignedOut);
}

#[tokio::test]
async fn toggling_an_unknown_item_sends_nothing() {
    let (_service, fake, client, mut manager) = start("owner").await;
    let mut table = load_table(&client, &mut manager).await;
    let before = fake.requests().len();

    let err = table
        .toggle(&client, &mut manager, &ItemId::new("i-missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::NotFound(_)));
    assert_eq!(fake.requests().len(), before);
}

#[tokio::test]
async fn restaurants_require_a_super_admin() {
    let (_service, fake, client, mut manager) = start("owner").await;
    let bearer = manager.bearer().await.unwrap();

    let err = client.restaurants(&bearer).await.unwrap_err();

    assert!(matches!(err, AdminError::Forbidden(_)));
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn super_admin_lists_restaurants() {
    let (_service, _fake, client, mut manager) = start("root").await;
    let bearer = manager.bearer().await.unwrap();
    assert!(bearer.is_super_admin());

    let restaurants = client.restaurants(&bearer).await.unwrap();

    assert_eq!(restaurants.len(), 1);
    assert_eq!(restaurants[0].name, "Spice Route");
}

#[tokio::test]
async fn invalid_category_is_rejected_before_sending() {
    let (_service, fake, client, mut manager) = start("owner").await;
    let bearer = manager.bearer().await.unwrap();

    let err = client
        .create_category(
            &bearer,
            &CategoryDraft {
                restaurant_id: RestaurantId::new("r-1"),
                name: "  ".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Validation(_)));
    assert!(fake.requests().is_empty());

    let created = client
        .create_category(
            &bearer,
            &CategoryDraft {
                restaurant_id: RestaurantId::new("r-1"),
                name: "Desserts".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Desserts");
    assert_eq!(fake.requests(), vec!["POST categories"]);
}
