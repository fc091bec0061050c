//! reqwest implementation of the catalog collaborator traits.
//!
//! The engine itself only sees [`CatalogService`] and [`SellerDirectory`]; this module
//! is what the binary plugs in.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Category, ListingId, UserId},
    error::ApiError,
    protocol::{
        CreatedListing, ListingDetail, ListingSummary, PageRequest, PageResponse, SellerProfile,
    },
};
use tracing::debug;

use crate::{
    catalog::{CatalogService, SellerDirectory},
    config::EngineSettings,
    differ::UpdatePayload,
    mapper::ListingDto,
    response::parse_created_listing,
};

const ID_PLACEHOLDER: &str = "{id}";

/// Route table for one category. Paths are appended to the base url; `{id}` is
/// replaced with the listing id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub list: String,
    pub get: String,
    pub create: String,
    pub update: String,
    pub delete: String,
}

impl Endpoints {
    pub fn for_category(category: Category) -> Self {
        let (list, get, create, update, delete) = match category {
            Category::Bike => (
                "/api/v1/bikes/getAllBikes",
                "/bikes/get/{id}",
                "/bikes/post",
                "/bikes/patch/{id}",
                "/bikes/delete/{id}",
            ),
            Category::Car => (
                "/api/v1/cars/getAllCars",
                "/api/v1/cars/{id}",
                "/api/v1/cars/add",
                "/api/v1/cars/update/{id}",
                "/api/v1/cars/delete/{id}",
            ),
            Category::Laptop => (
                "/api/laptops/getAll",
                "/api/laptops/getById?laptop_id={id}",
                "/api/laptops/create",
                "/api/laptops/update?laptopId={id}",
                "/api/laptops/delete?id={id}",
            ),
            Category::Mobile => (
                "/api/v1/mobiles/getAllMobiles",
                "/api/v1/mobiles/{id}",
                "/api/v1/mobiles/add",
                "/api/v1/mobiles/update/{id}",
                "/api/v1/mobiles/delete/{id}",
            ),
        };
        Self {
            list: list.into(),
            get: get.into(),
            create: create.into(),
            update: update.into(),
            delete: delete.into(),
        }
    }
}

fn with_id(template: &str, id: impl std::fmt::Display) -> String {
    template.replace(ID_PLACEHOLDER, &id.to_string())
}

/// Shared HTTP client honouring the configured request timeout.
pub fn http_client(settings: &EngineSettings) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
}

#[derive(Debug, Clone)]
struct Connection {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl Connection {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string));
        Err(ApiError::from_status(status, message))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::network(format!("invalid response body: {e}")))
    }
}

/// Catalog routes of one category over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    category: Category,
    endpoints: Endpoints,
    conn: Connection,
}

impl HttpCatalog {
    pub fn new(http: Client, base_url: impl Into<String>, category: Category) -> Self {
        Self {
            category,
            endpoints: Endpoints::for_category(category),
            conn: Connection {
                http,
                base_url: base_url.into(),
                token: None,
            },
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.conn.token = Some(token.into());
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    fn category(&self) -> Category {
        self.category
    }

    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<ListingSummary>, ApiError> {
        debug!(
            category = %self.category,
            page = request.page,
            size = request.size,
            "http: fetch page"
        );
        let builder = self
            .conn
            .http
            .get(self.conn.url(&self.endpoints.list))
            .query(&[
                ("page", request.page.to_string()),
                ("size", request.size.to_string()),
                ("sort", request.sort.clone()),
            ]);
        self.conn.json(builder).await
    }

    async fn get_by_id(&self, id: ListingId) -> Result<ListingDetail, ApiError> {
        let url = self.conn.url(&with_id(&self.endpoints.get, id));
        let mut detail: ListingDetail = self.conn.json(self.conn.http.get(url)).await?;
        detail.id.get_or_insert(id);
        Ok(detail)
    }

    async fn create_listing(&self, dto: &ListingDto) -> Result<CreatedListing, ApiError> {
        let url = self.conn.url(&self.endpoints.create);
        let body: Value = self.conn.json(self.conn.http.post(url).json(dto)).await?;
        Ok(parse_created_listing(self.category, &body))
    }

    async fn update_listing(&self, id: ListingId, payload: &UpdatePayload) -> Result<(), ApiError> {
        let url = self.conn.url(&with_id(&self.endpoints.update, id));
        self.conn.send(self.conn.http.patch(url).json(payload)).await?;
        Ok(())
    }

    async fn delete_listing(&self, id: ListingId) -> Result<(), ApiError> {
        let url = self.conn.url(&with_id(&self.endpoints.delete, id));
        self.conn.send(self.conn.http.delete(url)).await?;
        Ok(())
    }
}

/// `/api/v1/sellers/{userId}` lookups.
#[derive(Debug, Clone)]
pub struct HttpSellerDirectory {
    conn: Connection,
    path: String,
}

impl HttpSellerDirectory {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            conn: Connection {
                http,
                base_url: base_url.into(),
                token: None,
            },
            path: "/api/v1/sellers/{id}".into(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.conn.token = Some(token.into());
        self
    }
}

#[async_trait]
impl SellerDirectory for HttpSellerDirectory {
    async fn get_seller_contact(&self, user_id: UserId) -> Result<SellerProfile, ApiError> {
        let url = self.conn.url(&with_id(&self.path, user_id));
        self.conn.json(self.conn.http.get(url)).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
