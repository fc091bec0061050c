use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::json;
use shared::{domain::SellerId, error::ErrorCode};
use tokio::{net::TcpListener, sync::Mutex};

use super::*;
use crate::{
    differ::{build_update_payload, changed_fields},
    form::FormState,
    mapper::to_create_dto,
};

#[derive(Clone, Default)]
struct MockState {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

async fn list_cars(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth.lock().await.push(value.to_string());
    }
    state.queries.lock().await.push(query);
    Json(json!({
        "content": [
            { "carId": 1, "title": "Honda City ZX 2019", "price": 550000, "status": "ACTIVE" },
            { "carId": 2, "title": "Maruti Swift VXi", "price": "410000", "status": "DRAFT" }
        ],
        "last": false,
        "number": 0
    }))
}

async fn get_car(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Car not found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "carId": id, "sellerId": 4, "brand": "Honda", "price": 550000 })),
    )
}

async fn get_laptop(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "laptopId": query.get("laptop_id").and_then(|id| id.parse::<i64>().ok()),
        "price": 65000
    }))
}

async fn create_bike(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.bodies.lock().await.push(("create".into(), body));
    Json(json!({ "status": "201", "message": "Bike saved", "data": "BikeId:117" }))
}

async fn update_car(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.bodies.lock().await.push((format!("update:{id}"), body));
    StatusCode::NO_CONTENT
}

async fn delete_car(Path(id): Path<i64>) -> (StatusCode, String) {
    if id == 9 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "not json".into());
    }
    (StatusCode::OK, String::new())
}

async fn get_seller(Path(user_id): Path<i64>) -> Json<Value> {
    Json(json!({
        "sellerId": 3,
        "user": {
            "id": user_id,
            "firstName": "Asha",
            "lastName": "Rao",
            "mobileNumber": 9876543210u64
        }
    }))
}

async fn spawn_catalog_server() -> anyhow::Result<(String, MockState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MockState::default();
    let app = Router::new()
        .route("/api/v1/cars/getAllCars", get(list_cars))
        .route("/api/v1/cars/:id", get(get_car))
        .route("/api/v1/cars/update/:id", patch(update_car))
        .route("/api/v1/cars/delete/:id", delete(delete_car))
        .route("/api/laptops/getById", get(get_laptop))
        .route("/bikes/post", post(create_bike))
        .route("/api/v1/sellers/:user_id", get(get_seller))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn catalog(server_url: &str, category: Category) -> HttpCatalog {
    HttpCatalog::new(Client::new(), server_url, category)
}

#[tokio::test]
async fn fetch_page_sends_paging_query_and_token() {
    let (server_url, state) = spawn_catalog_server().await.expect("spawn server");
    let cars = catalog(&server_url, Category::Car).with_token("secret-token");

    let page = cars
        .fetch_page(&PageRequest {
            page: 2,
            size: 20,
            sort: "createdAt,DESC".into(),
        })
        .await
        .expect("page");

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[1].price, Some(410000.0));
    assert!(!page.is_last());

    let query = state.queries.lock().await.remove(0);
    assert_eq!(query.get("page").map(String::as_str), Some("2"));
    assert_eq!(query.get("size").map(String::as_str), Some("20"));
    assert_eq!(query.get("sort").map(String::as_str), Some("createdAt,DESC"));
    assert_eq!(
        state.auth.lock().await.as_slice(),
        ["Bearer secret-token".to_string()]
    );
}

#[tokio::test]
async fn get_by_id_fills_in_placeholders() {
    let (server_url, _state) = spawn_catalog_server().await.expect("spawn server");

    let car = catalog(&server_url, Category::Car)
        .get_by_id(ListingId(12))
        .await
        .expect("car");
    assert_eq!(car.id, Some(ListingId(12)));
    assert_eq!(car.seller_id, Some(SellerId(4)));

    let laptop = catalog(&server_url, Category::Laptop)
        .get_by_id(ListingId(31))
        .await
        .expect("laptop");
    assert_eq!(laptop.id, Some(ListingId(31)));
    assert_eq!(laptop.number("price"), Some(65000.0));
}

#[tokio::test]
async fn error_responses_carry_server_message() {
    let (server_url, _state) = spawn_catalog_server().await.expect("spawn server");
    let cars = catalog(&server_url, Category::Car);

    let err = cars.get_by_id(ListingId(404)).await.expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "Car not found");

    let err = cars.delete_listing(ListingId(9)).await.expect_err("server error");
    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(err.user_message("Please try again"), "Please try again");

    cars.delete_listing(ListingId(10)).await.expect("delete");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = catalog(&format!("http://{addr}"), Category::Car)
        .delete_listing(ListingId(1))
        .await
        .expect_err("refused");
    assert_eq!(err.code, ErrorCode::Network);
}

#[tokio::test]
async fn bike_create_parses_embedded_id() {
    let (server_url, state) = spawn_catalog_server().await.expect("spawn server");
    let form = FormState::new()
        .with("prize", "145000")
        .with("brand", "Royal Enfield")
        .with("manufactureYear", "2021");
    let dto = to_create_dto(Category::Bike, &form, SellerId(42));

    let created = catalog(&server_url, Category::Bike)
        .create_listing(&dto)
        .await
        .expect("create");
    assert_eq!(created.id, Some(ListingId(117)));
    assert_eq!(created.code, "201");
    assert_eq!(created.message, "Bike saved");

    let (route, body) = state.bodies.lock().await.remove(0);
    assert_eq!(route, "create");
    assert_eq!(body["prize"], json!(145000));
    assert_eq!(body["sellerId"], json!(42));
}

#[tokio::test]
async fn update_patches_only_the_payload() {
    let (server_url, state) = spawn_catalog_server().await.expect("spawn server");
    let form = FormState::new().with("price", "525000");
    let changed = changed_fields(&form, None);
    let payload = build_update_payload(Category::Car, &form, None, &changed, Some(SellerId(4)))
        .expect("payload");

    catalog(&server_url, Category::Car)
        .update_listing(ListingId(12), &payload)
        .await
        .expect("update");

    let (route, body) = state.bodies.lock().await.remove(0);
    assert_eq!(route, "update:12");
    assert_eq!(body, json!({ "price": 525000, "sellerId": 4 }));
}

#[tokio::test]
async fn seller_directory_reads_contact() {
    let (server_url, _state) = spawn_catalog_server().await.expect("spawn server");
    let sellers = HttpSellerDirectory::new(Client::new(), format!("{server_url}/"));

    let profile = sellers.get_seller_contact(UserId(8)).await.expect("seller");
    assert_eq!(profile.seller_id, Some(SellerId(3)));
    assert_eq!(profile.user.id, Some(UserId(8)));
    assert_eq!(profile.user.mobile_number.as_deref(), Some("9876543210"));
}

#[test]
fn endpoint_templates_replace_id() {
    let endpoints = Endpoints::for_category(Category::Laptop);
    assert_eq!(
        with_id(&endpoints.get, ListingId(7)),
        "/api/laptops/getById?laptop_id=7"
    );
    assert_eq!(Endpoints::for_category(Category::Bike).get, "/bikes/get/{id}");
}
