//! Storefront catalog client against a fake catalog/organization service.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use dine_core::{CategoryFilter, FoodType, FoodTypeFilter, RestaurantId};
use dine_integration_tests::{FakeService, categories_json, items_json, restaurant_json};
use dine_storefront::{CatalogClient, CatalogError, MenuPage, StorefrontConfig};

#[derive(Clone, Default)]
struct Hits {
    organization: Arc<AtomicUsize>,
    items: Arc<AtomicUsize>,
    categories: Arc<AtomicUsize>,
}

impl Hits {
    fn organization(&self) -> usize {
        self.organization.load(Ordering::SeqCst)
    }

    fn items(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }
}

async fn organization(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    hits.organization.fetch_add(1, Ordering::SeqCst);
    match id.as_str() {
        "r-1" | "r-broken" => Json(restaurant_json()).into_response(),
        "r-busy" => (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", "7")],
            "slow down",
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn items(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    hits.items.fetch_add(1, Ordering::SeqCst);
    match id.as_str() {
        "r-1" => Json(items_json()).into_response(),
        "r-broken" => (StatusCode::INTERNAL_SERVER_ERROR, "catalog exploded").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn categories(State(hits): State<Hits>, Path(id): Path<String>) -> Response {
    hits.categories.fetch_add(1, Ordering::SeqCst);
    match id.as_str() {
        "r-1" | "r-broken" => Json(categories_json()).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn start() -> (FakeService, Hits, CatalogClient) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/v1/organizations/id/{id}", get(organization))
        .route("/api/v1/items/restaurant/{id}", get(items))
        .route("/api/v1/categories/restaurant/{id}", get(categories))
        .with_state(hits.clone());
    let service = FakeService::start(router).await;
    let client = CatalogClient::new(&StorefrontConfig::for_base_url(service.url.clone())).unwrap();
    (service, hits, client)
}

#[tokio::test]
async fn load_menu_groups_enabled_items_by_category() {
    let (_service, _hits, client) = start().await;

    let MenuPage::Ready(menu) = client.load_menu(&RestaurantId::new("r-1")).await.unwrap() else {
        panic!("expected a menu");
    };

    assert_eq!(menu.restaurant().name, "Spice Route");
    assert_eq!(menu.items().len(), 5);

    let sections = menu.sections(&CategoryFilter::All, FoodTypeFilter::All);
    let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
    assert_eq!(titles, vec!["Starters", "Mains", "Seasonal"]);

    let mains: Vec<&str> = sections[1].items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(mains, vec!["i-chicken", "i-naan"]);

    let veg = menu.sections(&CategoryFilter::All, FoodTypeFilter::Only(FoodType::Veg));
    let veg_titles: Vec<&str> = veg.iter().map(|s| s.title).collect();
    assert_eq!(veg_titles, vec!["Starters", "Mains"]);

    let drinks = menu.category_filter(Some("drinks")).unwrap();
    assert!(menu.sections(&drinks, FoodTypeFilter::All).is_empty());
    assert!(menu.category_filter(Some("desserts")).is_none());
}

#[tokio::test]
async fn unknown_restaurant_is_not_found() {
    let (_service, hits, client) = start().await;

    let page = client.load_menu(&RestaurantId::new("r-404")).await.unwrap();

    assert!(matches!(page, MenuPage::NotFound));
    assert_eq!(hits.organization(), 1);
    assert_eq!(hits.items(), 0);
}

#[tokio::test]
async fn responses_are_cached_until_invalidated() {
    let (_service, hits, client) = start().await;
    let id = RestaurantId::new("r-1");

    client.load_menu(&id).await.unwrap();
    client.load_menu(&id).await.unwrap();
    assert_eq!(hits.organization(), 1);
    assert_eq!(hits.items(), 1);

    client.invalidate(&id).await;
    client.load_menu(&id).await.unwrap();
    assert_eq!(hits.organization(), 2);
    assert_eq!(hits.items(), 2);
}

#[tokio::test]
async fn not_found_restaurant_is_cached() {
    let (_service, hits, client) = start().await;
    let id = RestaurantId::new("r-404");

    assert!(client.restaurant(&id).await.unwrap().is_none());
    assert!(client.restaurant(&id).await.unwrap().is_none());
    assert_eq!(hits.organization(), 1);
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after() {
    let (_service, _hits, client) = start().await;

    let err = client
        .load_menu(&RestaurantId::new("r-busy"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::RateLimited(7)));
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let (_service, _hits, client) = start().await;

    let err = client
        .load_menu(&RestaurantId::new("r-broken"))
        .await
        .unwrap_err();

    match err {
        CatalogError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "catalog exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}
