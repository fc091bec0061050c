use std::sync::Arc;

use shared::{
    domain::{Category, ListingId},
    protocol::ListingSummary,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{catalog::CatalogService, pagination::ListController};

const DELETE_FALLBACK_MESSAGE: &str = "Please try again";

/// Where the UI should go after an edit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    UpdateListing { category: Category, id: ListingId },
}

/// Prompt to show before a delete is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: ListingId,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing selected, a different listing selected than the one confirmed, or a
    /// delete already running. No request was made.
    Ignored,
    Deleted { id: ListingId, notice: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("{message}")]
    Failed { id: ListingId, message: String },
}

impl DeleteError {
    pub fn user_message(&self) -> &str {
        match self {
            DeleteError::Failed { message, .. } => message,
        }
    }
}

#[derive(Debug, Default)]
struct MenuState {
    selected: Option<ListingSummary>,
    menu_open: bool,
    deleting: bool,
}

/// Action menu for one listing screen: edit navigation and guarded deletes.
///
/// A successful delete is followed by a full reset-fetch of the list rather than a
/// local removal.
pub struct EditDeleteCoordinator {
    catalog: Arc<dyn CatalogService>,
    list: Arc<ListController>,
    state: Mutex<MenuState>,
}

impl EditDeleteCoordinator {
    pub fn new(catalog: Arc<dyn CatalogService>, list: Arc<ListController>) -> Self {
        Self {
            catalog,
            list,
            state: Mutex::new(MenuState::default()),
        }
    }

    pub async fn select_for_menu(&self, item: ListingSummary) {
        let mut state = self.state.lock().await;
        state.selected = Some(item);
        state.menu_open = true;
    }

    pub async fn close_menu(&self) {
        let mut state = self.state.lock().await;
        state.menu_open = false;
        state.selected = None;
    }

    pub async fn selected(&self) -> Option<ListingSummary> {
        self.state.lock().await.selected.clone()
    }

    pub async fn is_menu_open(&self) -> bool {
        self.state.lock().await.menu_open
    }

    pub async fn is_deleting(&self) -> bool {
        self.state.lock().await.deleting
    }

    /// Navigation target for the selected listing; closes the menu. No network call.
    pub async fn edit(&self) -> Option<NavigationIntent> {
        let mut state = self.state.lock().await;
        let id = state.selected.as_ref()?.id;
        state.menu_open = false;
        state.selected = None;
        Some(NavigationIntent::UpdateListing {
            category: self.catalog.category(),
            id,
        })
    }

    /// First step of a delete: the confirmation prompt, or `None` when a delete is not
    /// currently allowed.
    pub async fn request_delete(&self) -> Option<DeleteConfirmation> {
        let state = self.state.lock().await;
        if state.deleting {
            return None;
        }
        let id = state.selected.as_ref()?.id;
        let noun = self.catalog.category().noun();
        Some(DeleteConfirmation {
            id,
            title: format!("Delete {noun}"),
            message: format!("Are you sure you want to delete this {noun}?"),
        })
    }

    /// Accepted confirmation: deletes the listing the prompt named.
    ///
    /// Ignored unless that listing is still the selection. On failure the selection and
    /// menu stay as they were and the action is re-enabled.
    pub async fn confirm_delete(
        &self,
        confirmation: &DeleteConfirmation,
    ) -> Result<DeleteOutcome, DeleteError> {
        let id = {
            let mut state = self.state.lock().await;
            let Some(id) = state.selected.as_ref().map(|item| item.id) else {
                return Ok(DeleteOutcome::Ignored);
            };
            if id != confirmation.id {
                debug!(
                    confirmed = confirmation.id.0,
                    selected = id.0,
                    "delete: selection changed since the prompt"
                );
                return Ok(DeleteOutcome::Ignored);
            }
            if state.deleting {
                return Ok(DeleteOutcome::Ignored);
            }
            state.deleting = true;
            id
        };

        let category = self.catalog.category();
        match self.catalog.delete_listing(id).await {
            Ok(()) => {
                info!(category = %category, listing_id = id.0, "delete: listing removed");
                self.list.reset_fetch().await;
                let mut state = self.state.lock().await;
                state.deleting = false;
                state.menu_open = false;
                state.selected = None;
                Ok(DeleteOutcome::Deleted {
                    id,
                    notice: format!("{} soft-deleted", category.label()),
                })
            }
            Err(err) => {
                warn!(category = %category, listing_id = id.0, error = %err, "delete: failed");
                self.state.lock().await.deleting = false;
                Err(DeleteError::Failed {
                    id,
                    message: err.user_message(DELETE_FALLBACK_MESSAGE),
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
