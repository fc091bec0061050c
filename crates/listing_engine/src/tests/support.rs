use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::{Category, ListingId, UserId},
    error::ApiError,
    protocol::{
        CreatedListing, ListingDetail, ListingSummary, PageRequest, PageResponse, SellerProfile,
    },
};
use tokio::sync::{Mutex, Notify};

use crate::{
    catalog::{CatalogService, SellerDirectory},
    differ::UpdatePayload,
    mapper::ListingDto,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    FetchPage(PageRequest),
    GetById(ListingId),
    Create(Value),
    Update(ListingId, Value),
    Delete(ListingId),
}

/// In-memory catalog. Failures and gates are keyed by operation label
/// (`fetch_page:<n>`, `get_by_id`, `create`, `update`, `delete`); a gate holds the next
/// matching call until released.
pub(crate) struct FakeCatalog {
    category: Category,
    pages: Mutex<HashMap<u32, PageResponse<ListingSummary>>>,
    detail: Mutex<ListingDetail>,
    failures: Mutex<HashMap<String, ApiError>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeCatalog {
    pub(crate) fn new(category: Category) -> Self {
        Self {
            category,
            pages: Mutex::new(HashMap::new()),
            detail: Mutex::new(ListingDetail::default()),
            failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_pages(mut self, pages: Vec<PageResponse<ListingSummary>>) -> Self {
        let slots = self.pages.get_mut();
        for (number, page) in pages.into_iter().enumerate() {
            slots.insert(number as u32, page);
        }
        self
    }

    pub(crate) fn with_detail(mut self, detail: ListingDetail) -> Self {
        *self.detail.get_mut() = detail;
        self
    }

    pub(crate) fn failing(mut self, op: &str, err: ApiError) -> Self {
        self.failures.get_mut().insert(op.to_string(), err);
        self
    }

    pub(crate) async fn set_page(&self, number: u32, page: PageResponse<ListingSummary>) {
        self.pages.lock().await.insert(number, page);
    }

    pub(crate) async fn fail(&self, op: &str, err: ApiError) {
        self.failures.lock().await.insert(op.to_string(), err);
    }

    pub(crate) async fn clear_failure(&self, op: &str) {
        self.failures.lock().await.remove(op);
    }

    /// Holds the next `op` call until the returned handle is notified.
    pub(crate) async fn hold(&self, op: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().await.insert(op.to_string(), gate.clone());
        gate
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn delete_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| matches!(call, Call::Delete(_)))
            .count()
    }

    pub(crate) async fn update_calls(&self) -> Vec<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::Update(_, body) => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    /// Yields until at least `count` calls were recorded.
    pub(crate) async fn wait_for_calls(&self, count: usize) {
        for _ in 0..1_000 {
            if self.calls.lock().await.len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {count} catalog calls");
    }

    async fn enter(&self, op: &str, call: Call) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        let gate = self.gates.lock().await.remove(op);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.failures.lock().await.get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    fn category(&self) -> Category {
        self.category
    }

    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<ListingSummary>, ApiError> {
        self.enter(
            &format!("fetch_page:{}", request.page),
            Call::FetchPage(request.clone()),
        )
        .await?;
        Ok(self
            .pages
            .lock()
            .await
            .get(&request.page)
            .cloned()
            .unwrap_or_else(|| PageResponse::new(Vec::new(), true)))
    }

    async fn get_by_id(&self, id: ListingId) -> Result<ListingDetail, ApiError> {
        self.enter("get_by_id", Call::GetById(id)).await?;
        Ok(self.detail.lock().await.clone())
    }

    async fn create_listing(&self, dto: &ListingDto) -> Result<CreatedListing, ApiError> {
        let body = serde_json::to_value(dto).expect("dto json");
        self.enter("create", Call::Create(body)).await?;
        Ok(CreatedListing {
            id: Some(ListingId(501)),
            code: "200".into(),
            message: "created".into(),
        })
    }

    async fn update_listing(&self, id: ListingId, payload: &UpdatePayload) -> Result<(), ApiError> {
        let body = serde_json::to_value(payload).expect("payload json");
        self.enter("update", Call::Update(id, body)).await
    }

    async fn delete_listing(&self, id: ListingId) -> Result<(), ApiError> {
        self.enter("delete", Call::Delete(id)).await
    }
}

pub(crate) struct FakeSellers {
    profile: SellerProfile,
    fail_with: Option<ApiError>,
    lookups: Arc<Mutex<Vec<UserId>>>,
}

impl FakeSellers {
    pub(crate) fn ok(profile: SellerProfile) -> Self {
        Self {
            profile,
            fail_with: None,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing(err: ApiError) -> Self {
        Self {
            profile: SellerProfile {
                seller_id: None,
                user: Default::default(),
            },
            fail_with: Some(err),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) async fn lookups(&self) -> Vec<UserId> {
        self.lookups.lock().await.clone()
    }
}

#[async_trait]
impl SellerDirectory for FakeSellers {
    async fn get_seller_contact(&self, user_id: UserId) -> Result<SellerProfile, ApiError> {
        self.lookups.lock().await.push(user_id);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(self.profile.clone())
    }
}

pub(crate) fn summary(id: i64, status: &str) -> ListingSummary {
    ListingSummary::new(ListingId(id), format!("Listing {id}"), Some(status))
}

/// `count` consecutive summaries starting at id `first`, all `ACTIVE`.
pub(crate) fn page(first: i64, count: usize, last: bool) -> PageResponse<ListingSummary> {
    let content = (first..first + count as i64)
        .map(|id| summary(id, "ACTIVE"))
        .collect();
    PageResponse::new(content, last)
}
