use std::{collections::BTreeSet, sync::Arc};

use shared::{
    domain::{Category, ListingId, SellerId},
    error::ApiError,
    protocol::CreatedListing,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    catalog::CatalogService,
    differ::{build_update_payload, changed_fields, resolve_seller_id},
    form::{BaselineSnapshot, FieldValue, FormState},
    mapper::to_create_dto,
    validation::{FieldErrors, FormSession, Validator},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(CreatedListing),
    Updated {
        id: ListingId,
        fields: BTreeSet<String>,
    },
    /// Another submission from the same screen is still pending.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(FieldErrors),
    #[error("No changes detected")]
    NoChanges,
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl SubmitError {
    fn network(source: ApiError, action: &str, category: Category) -> Self {
        let fallback = format!("Failed to {action} {}", category.noun());
        SubmitError::Network {
            message: source.user_message(&fallback),
            source,
        }
    }
}

/// Create screen submission: validate, map, send.
pub struct ListingCreator {
    catalog: Arc<dyn CatalogService>,
    validator: Validator,
    submitting: Mutex<bool>,
}

impl ListingCreator {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        let validator = Validator::new(catalog.category());
        Self::with_validator(catalog, validator)
    }

    pub fn with_validator(catalog: Arc<dyn CatalogService>, validator: Validator) -> Self {
        Self {
            catalog,
            validator,
            submitting: Mutex::new(false),
        }
    }

    pub async fn submit(
        &self,
        form: &FormState,
        seller_id: SellerId,
    ) -> Result<SubmitOutcome, SubmitError> {
        {
            let mut submitting = self.submitting.lock().await;
            if *submitting {
                return Ok(SubmitOutcome::Ignored);
            }
            let validation = self.validator.validate_form(form);
            if !validation.is_valid() {
                return Err(SubmitError::Invalid(validation.errors));
            }
            *submitting = true;
        }

        let category = self.catalog.category();
        let dto = to_create_dto(category, form, seller_id);
        let result = self.catalog.create_listing(&dto).await;
        *self.submitting.lock().await = false;

        match result {
            Ok(created) => {
                info!(
                    category = %category,
                    listing_id = ?created.id.map(|id| id.0),
                    seller_id = seller_id.0,
                    "create: listing created"
                );
                Ok(SubmitOutcome::Created(created))
            }
            Err(err) => {
                warn!(category = %category, error = %err, "create: failed");
                Err(SubmitError::network(err, "create", category))
            }
        }
    }
}

#[derive(Debug)]
struct EditorState {
    session: FormSession,
    baseline: Option<BaselineSnapshot>,
    owner: Option<SellerId>,
    load_error: Option<String>,
    saving: bool,
}

/// Update screen: loaded values, the baseline they are diffed against, and the save
/// flow.
pub struct ListingEditor {
    catalog: Arc<dyn CatalogService>,
    id: ListingId,
    state: Mutex<EditorState>,
}

impl ListingEditor {
    /// Fetches the listing and captures the baseline.
    ///
    /// A failed fetch still yields an editor: blank form, no baseline, so every field
    /// the user then fills in is sent.
    pub async fn load(catalog: Arc<dyn CatalogService>, id: ListingId) -> Self {
        let validator = Validator::new(catalog.category());
        Self::load_with_validator(catalog, id, validator).await
    }

    pub async fn load_with_validator(
        catalog: Arc<dyn CatalogService>,
        id: ListingId,
        validator: Validator,
    ) -> Self {
        let category = catalog.category();
        let state = match catalog.get_by_id(id).await {
            Ok(detail) => {
                let form = FormState::from_detail(category, &detail);
                EditorState {
                    baseline: Some(BaselineSnapshot::capture(&form)),
                    session: FormSession::new(validator, form),
                    owner: detail.seller_id,
                    load_error: None,
                    saving: false,
                }
            }
            Err(err) => {
                warn!(category = %category, listing_id = id.0, error = %err, "update: load failed");
                let fallback = format!("Failed to load {}", category.noun());
                EditorState {
                    session: FormSession::new(validator, FormState::blank(category)),
                    baseline: None,
                    owner: None,
                    load_error: Some(err.user_message(&fallback)),
                    saving: false,
                }
            }
        };
        Self {
            catalog,
            id,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub async fn load_error(&self) -> Option<String> {
        self.state.lock().await.load_error.clone()
    }

    pub async fn form(&self) -> FormState {
        self.state.lock().await.session.form().clone()
    }

    pub async fn baseline(&self) -> Option<BaselineSnapshot> {
        self.state.lock().await.baseline.clone()
    }

    pub async fn owner(&self) -> Option<SellerId> {
        self.state.lock().await.owner
    }

    pub async fn is_saving(&self) -> bool {
        self.state.lock().await.saving
    }

    pub async fn set_value(&self, field: &str, value: impl Into<FieldValue>) {
        self.state.lock().await.session.set_value(field, value);
    }

    pub async fn blur(&self, field: &str) {
        self.state.lock().await.session.blur(field);
    }

    pub async fn visible_error(&self, field: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .session
            .visible_error(field)
            .map(str::to_string)
    }

    /// Saves the changed fields.
    ///
    /// `session_seller` is used only when the loaded listing did not name its owner.
    pub async fn submit(
        &self,
        session_seller: Option<SellerId>,
    ) -> Result<SubmitOutcome, SubmitError> {
        let category = self.catalog.category();
        let (submitted, changed, payload) = {
            let mut state = self.state.lock().await;
            if state.saving {
                return Ok(SubmitOutcome::Ignored);
            }
            if !state.session.validate_all() {
                return Err(SubmitError::Invalid(state.session.errors().clone()));
            }
            let form = state.session.form().clone();
            let changed = changed_fields(&form, state.baseline.as_ref());
            let seller_id = resolve_seller_id(state.owner, session_seller);
            let baseline = state.baseline.as_ref();
            let Some(payload) = build_update_payload(category, &form, baseline, &changed, seller_id)
            else {
                info!(category = %category, listing_id = self.id.0, "update: no changes detected");
                return Err(SubmitError::NoChanges);
            };
            let sent: BTreeSet<String> = changed
                .into_iter()
                .filter(|field| payload.contains(field))
                .collect();
            state.saving = true;
            (form, sent, payload)
        };

        let result = self.catalog.update_listing(self.id, &payload).await;

        let mut state = self.state.lock().await;
        state.saving = false;
        match result {
            Ok(()) => {
                info!(
                    category = %category,
                    listing_id = self.id.0,
                    changed = changed.len(),
                    "update: listing saved"
                );
                state.baseline = Some(BaselineSnapshot::capture(&submitted));
                Ok(SubmitOutcome::Updated {
                    id: self.id,
                    fields: changed,
                })
            }
            Err(err) => {
                warn!(category = %category, listing_id = self.id.0, error = %err, "update: failed");
                Err(SubmitError::network(err, "update", category))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
