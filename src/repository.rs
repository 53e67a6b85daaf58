//! The item collection and its mutators.
//!
//! [`Inventory`] owns the in-memory items and writes the whole collection
//! back through its [`Storage`] on every change. The in-memory collection
//! only changes once that write has succeeded.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::entity::{example_items, CodeCartItem, ItemData};
use crate::error::{CodeCartError, Result};
use crate::storage::{self, Loaded, Storage, ITEMS_KEY};

/// Proof that a delete was requested for a specific item.
///
/// Obtained from [`Inventory::request_delete`] and consumed by
/// [`Inventory::confirm_delete`]. Dropping it cancels the delete.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a delete only happens once the token is confirmed"]
pub struct DeleteToken {
    id: Uuid,
}

impl DeleteToken {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

pub struct Inventory<S: Storage> {
    items: Vec<CodeCartItem>,
    storage: S,
}

impl<S: Storage> Inventory<S> {
    /// Load the collection from `storage`.
    ///
    /// * Nothing stored yet: the example set is generated relative to
    ///   `today`/`now` and persisted, so later loads see the same ids.
    /// * Stored but unparseable: the raw text is copied to the corrupt-backup
    ///   key and the tracker starts from an empty collection. Nothing is
    ///   written to the items key until the next mutation.
    /// * Stored but unreadable: empty collection, nothing written.
    pub fn load(storage: S, today: NaiveDate, now: DateTime<Utc>) -> Result<Self> {
        let items = match storage::load_entry::<Vec<CodeCartItem>, _>(&storage, ITEMS_KEY) {
            Loaded::Found(items) => {
                tracing::debug!(count = items.len(), "loaded items");
                items
            }
            Loaded::Missing => {
                let seed = example_items(today, now);
                tracing::info!(count = seed.len(), "seeding example items");
                storage::save(&storage, ITEMS_KEY, &seed)?;
                seed
            }
            Loaded::Corrupt { raw } => {
                let backup = storage::corrupt_key(ITEMS_KEY);
                storage.write(&backup, &raw)?;
                tracing::warn!(
                    backup = %backup,
                    "stored items could not be parsed; original kept as backup, starting empty"
                );
                Vec::new()
            }
            Loaded::Unreadable => {
                tracing::warn!("stored items could not be read; starting empty");
                Vec::new()
            }
        };

        Ok(Self { items, storage })
    }

    /// Start from an explicit collection without touching storage.
    pub fn with_items(storage: S, items: Vec<CodeCartItem>) -> Self {
        Self { items, storage }
    }

    pub fn items(&self) -> &[CodeCartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, id: &Uuid) -> Option<&CodeCartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Resolve a full UUID or an unambiguous UUID prefix.
    pub fn find(&self, query: &str) -> Result<&CodeCartItem> {
        let query = query.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&query) {
            return self
                .get(&id)
                .ok_or_else(|| CodeCartError::ItemNotFound(query.clone()));
        }

        let mut matches = self
            .items
            .iter()
            .filter(|item| !query.is_empty() && item.id.to_string().starts_with(&query));

        match (matches.next(), matches.next()) {
            (Some(item), None) => Ok(item),
            (Some(_), Some(_)) => Err(CodeCartError::AmbiguousId(query)),
            (None, _) => Err(CodeCartError::ItemNotFound(query)),
        }
    }

    /// Add a new item stamped with the current time.
    pub fn add(&mut self, data: ItemData) -> Result<&CodeCartItem> {
        self.add_at(data, Utc::now())
    }

    /// Add a new item with an explicit creation time.
    pub fn add_at(&mut self, data: ItemData, created_at: DateTime<Utc>) -> Result<&CodeCartItem> {
        let item = CodeCartItem::new(data, created_at);
        let id = item.id;

        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(item);
        items.extend(self.items.iter().cloned());
        // Stable sort keeps the new item ahead of any equal timestamps.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.commit(items)?;

        tracing::info!(%id, "added item");
        let index = self.index_of(&id).unwrap_or(0);
        Ok(&self.items[index])
    }

    /// Replace the editable fields of the item with `id`.
    ///
    /// `id`, `created_at` and the item's position are kept. Returns `None`
    /// without writing anything when no item has that id.
    pub fn edit(&mut self, id: &Uuid, data: ItemData) -> Result<Option<&CodeCartItem>> {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(%id, "edit of unknown item ignored");
            return Ok(None);
        };

        let mut items = self.items.clone();
        items[index].data = data.normalized();
        self.commit(items)?;

        tracing::info!(%id, "edited item");
        Ok(Some(&self.items[index]))
    }

    /// First step of a delete. `None` when no item has that id.
    pub fn request_delete(&self, id: &Uuid) -> Option<DeleteToken> {
        self.get(id).map(|item| DeleteToken { id: item.id })
    }

    /// Second step of a delete: remove the item named by `token`.
    ///
    /// Returns the removed item, or `None` if it disappeared in between.
    pub fn confirm_delete(&mut self, token: DeleteToken) -> Result<Option<CodeCartItem>> {
        let Some(index) = self.index_of(&token.id) else {
            tracing::debug!(id = %token.id, "delete of unknown item ignored");
            return Ok(None);
        };

        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit(items)?;

        tracing::info!(id = %removed.id, "deleted item");
        Ok(Some(removed))
    }

    fn index_of(&self, id: &Uuid) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Write `items` through and adopt them only if the write succeeded.
    fn commit(&mut self, items: Vec<CodeCartItem>) -> Result<()> {
        storage::save(&self.storage, ITEMS_KEY, &items)?;
        self.items = items;
        Ok(())
    }
}
