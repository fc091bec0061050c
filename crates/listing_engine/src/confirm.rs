use shared::{
    domain::{ListingId, UserId},
    error::ApiError,
    protocol::{ConfirmDetails, ListingDetail, SellerContact},
};
use tracing::debug;

use crate::{
    catalog::{CatalogService, SellerDirectory},
    mapper::wire,
};

/// Price of a listing combined with its seller's contact, for the confirm step.
///
/// Both reads run concurrently; if either fails the whole call fails.
pub async fn confirm_details(
    catalog: &dyn CatalogService,
    sellers: &dyn SellerDirectory,
    listing_id: ListingId,
    user_id: UserId,
) -> Result<ConfirmDetails, ApiError> {
    let (detail, profile) = futures::try_join!(
        catalog.get_by_id(listing_id),
        sellers.get_seller_contact(user_id)
    )?;
    debug!(
        category = %catalog.category(),
        listing_id = listing_id.0,
        user_id = user_id.0,
        "confirm: details joined"
    );
    Ok(combine(catalog.category().price_key(), &detail, &profile.user))
}

fn combine(price_key: &str, detail: &ListingDetail, contact: &SellerContact) -> ConfirmDetails {
    let price = detail
        .number(price_key)
        .or_else(|| detail.number("price"))
        .map(|price| wire::to_json(price).to_string())
        .unwrap_or_default();
    let name = format!(
        "{} {}",
        trimmed(contact.first_name.as_deref()),
        trimmed(contact.last_name.as_deref())
    )
    .trim()
    .to_string();

    ConfirmDetails {
        price,
        name,
        phone_number: trimmed(contact.mobile_number.as_deref()).to_string(),
    }
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
