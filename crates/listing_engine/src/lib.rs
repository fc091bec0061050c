pub mod catalog;
pub mod config;
pub mod confirm;
pub mod coordinator;
pub mod differ;
pub mod editor;
pub mod form;
pub mod mapper;
pub mod money;
pub mod pagination;
pub mod response;
pub mod schema;
pub mod status_filter;
pub mod transport;
pub mod validation;

pub use catalog::{CatalogService, SellerDirectory};
pub use config::{load_settings, EngineSettings};
pub use confirm::confirm_details;
pub use coordinator::{
    DeleteConfirmation, DeleteError, DeleteOutcome, EditDeleteCoordinator, NavigationIntent,
};
pub use differ::{build_update_payload, changed_fields, resolve_seller_id, UpdatePayload};
pub use editor::{ListingCreator, ListingEditor, SubmitError, SubmitOutcome};
pub use form::{BaselineSnapshot, FieldValue, FormState};
pub use mapper::{to_create_dto, ListingDto};
pub use money::format_inr;
pub use pagination::{FetchOutcome, ListController, ListPhase, PageCursor};
pub use status_filter::{badge_label, filter_by_tab, StatusFilter, StatusTab};
pub use transport::{http_client, Endpoints, HttpCatalog, HttpSellerDirectory};
pub use validation::{FieldErrors, FormSession, FormValidation, Validator};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
