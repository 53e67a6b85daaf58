//! Top-level application state.
//!
//! [`App`] owns the inventory, the access gate and the modal. Views read from
//! it and every user intent (save form, delete) goes through it.

use uuid::Uuid;

use crate::config::Config;
use crate::entity::{CodeCartItem, ItemData};
use crate::error::{CodeCartError, Result};
use crate::gate::{AccessGate, Verifier};
use crate::repository::{DeleteToken, Inventory};
use crate::status::StatusThresholds;
use crate::storage::Storage;
use crate::view::{FormMode, Modal};

pub struct App<S: Storage, G: Storage> {
    inventory: Inventory<S>,
    gate: AccessGate<G>,
    modal: Modal,
    thresholds: StatusThresholds,
}

impl<S: Storage, G: Storage> App<S, G> {
    pub fn new(inventory: Inventory<S>, gate: AccessGate<G>, config: &Config) -> Self {
        Self {
            inventory,
            gate,
            modal: Modal::new(),
            thresholds: config.thresholds,
        }
    }

    pub fn inventory(&self) -> &Inventory<S> {
        &self.inventory
    }

    pub fn items(&self) -> &[CodeCartItem] {
        self.inventory.items()
    }

    pub fn gate(&self) -> &AccessGate<G> {
        &self.gate
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    pub fn require_unlocked(&self) -> Result<()> {
        self.gate.require_unlocked()
    }

    pub fn unlock(&mut self, secret: &str, verifier: &dyn Verifier) -> Result<bool> {
        self.gate.unlock(secret, verifier)
    }

    pub fn lock(&mut self) -> Result<()> {
        self.gate.lock()
    }

    /// Open the modal in `mode`. Edit mode needs the item being edited;
    /// without one the modal falls back to add mode.
    pub fn open_modal(&mut self, mode: FormMode, item: Option<CodeCartItem>) {
        match (mode, item) {
            (FormMode::Edit, Some(item)) => self.modal.open_edit(item),
            _ => self.modal.open_add(),
        }
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// Submit the modal's form: edits the item it holds in edit mode,
    /// otherwise adds a new item. The modal is closed afterwards.
    ///
    /// Returns the saved item, or `None` if the edited item no longer exists.
    pub fn save_item(&mut self, data: ItemData) -> Result<Option<CodeCartItem>> {
        let editing = match self.modal.mode() {
            FormMode::Edit => self.modal.editing().map(|item| item.id),
            FormMode::Add => None,
        };

        let saved = match editing {
            Some(id) => self.inventory.edit(&id, data)?.cloned(),
            None => Some(self.inventory.add(data)?.clone()),
        };

        self.modal.close();
        Ok(saved)
    }

    /// Resolve `query` to an item id (full UUID or unique prefix).
    pub fn resolve(&self, query: &str) -> Result<Uuid> {
        self.inventory.find(query).map(|item| item.id)
    }

    pub fn request_delete(&self, id: &Uuid) -> Result<DeleteToken> {
        self.inventory
            .request_delete(id)
            .ok_or_else(|| CodeCartError::ItemNotFound(id.to_string()))
    }

    pub fn confirm_delete(&mut self, token: DeleteToken) -> Result<Option<CodeCartItem>> {
        self.inventory.confirm_delete(token)
    }
}
