use async_trait::async_trait;
use shared::{
    domain::{Category, ListingId, UserId},
    error::ApiError,
    protocol::{
        CreatedListing, ListingDetail, ListingSummary, PageRequest, PageResponse, SellerProfile,
    },
};

use crate::{differ::UpdatePayload, mapper::ListingDto};

/// Remote catalog operations for a single category.
#[async_trait]
pub trait CatalogService: Send + Sync {
    fn category(&self) -> Category;

    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<ListingSummary>, ApiError>;

    async fn get_by_id(&self, id: ListingId) -> Result<ListingDetail, ApiError>;

    async fn create_listing(&self, dto: &ListingDto) -> Result<CreatedListing, ApiError>;

    async fn update_listing(&self, id: ListingId, payload: &UpdatePayload) -> Result<(), ApiError>;

    /// Soft delete on the server; callers treat the listing as gone.
    async fn delete_listing(&self, id: ListingId) -> Result<(), ApiError>;
}

/// Lookup of the contact details behind a seller account.
#[async_trait]
pub trait SellerDirectory: Send + Sync {
    async fn get_seller_contact(&self, user_id: UserId) -> Result<SellerProfile, ApiError>;
}
