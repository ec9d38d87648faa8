//! The board: an explicit, owned catalog of buckets, layers, items, and goal
//! ids.
//!
//! # Overview
//!
//! Every engine call takes a `&Board` (analysis) or `&mut Board` (mutation).
//! There is no process-wide catalog, so tests and callers can hold as many
//! isolated boards as they like.
//!
//! The catalog is fixed after construction. The only runtime mutation is an
//! item's current bucket, changed through [`Board::move_item`],
//! [`Board::reset_to_original`], or a validated snapshot import
//! ([`crate::snapshot`]). An item's layer never changes.
//!
//! Dangling dependency ids are tolerated here; they are reported by
//! [`crate::graph::integrity`] and skipped by every traversal.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{CatalogError, MoveError};
use crate::model::{Bucket, Item, Layer};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    buckets: Vec<Bucket>,
    layers: Vec<Layer>,
    items: Vec<Item>,
    goals: Vec<String>,
    item_index: HashMap<String, usize>,
    bucket_index: HashMap<String, usize>,
}

/// Record of a bucket change applied to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMove {
    pub item_id: String,
    pub from: String,
    pub to: String,
}

impl Board {
    /// Build a board from its catalog parts.
    ///
    /// Buckets are taken in schedule order. Items keep their declaration
    /// order, which is the tie-breaker for every ranked output. An item with
    /// an empty `original_bucket` gets its current bucket as the original.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate bucket, layer, or item ids,
    /// and for items that reference an undeclared layer or bucket.
    pub fn new(
        buckets: Vec<Bucket>,
        layers: Vec<Layer>,
        mut items: Vec<Item>,
        goals: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let mut bucket_index = HashMap::with_capacity(buckets.len());
        for (idx, bucket) in buckets.iter().enumerate() {
            if bucket_index.insert(bucket.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateBucket(bucket.id.clone()));
            }
        }

        let mut layer_ids = HashSet::with_capacity(layers.len());
        for layer in &layers {
            if !layer_ids.insert(layer.id.as_str()) {
                return Err(CatalogError::DuplicateLayer(layer.id.clone()));
            }
        }

        let mut item_index = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter_mut().enumerate() {
            if item.original_bucket.is_empty() {
                item.original_bucket.clone_from(&item.bucket);
            }
            if !layer_ids.contains(item.layer.as_str()) {
                return Err(CatalogError::UnknownLayer {
                    item_id: item.id.clone(),
                    layer: item.layer.clone(),
                });
            }
            for bucket in [&item.bucket, &item.original_bucket] {
                if !bucket_index.contains_key(bucket) {
                    return Err(CatalogError::UnknownBucket {
                        item_id: item.id.clone(),
                        bucket: bucket.clone(),
                    });
                }
            }
            if item_index.insert(item.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self {
            buckets,
            layers,
            items,
            goals,
            item_index,
            bucket_index,
        })
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Items in declaration order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Buckets in schedule order.
    #[must_use]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Goal ids as declared. May name ids that are not items.
    #[must_use]
    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.item_index.get(item_id).map(|&idx| &self.items[idx])
    }

    #[must_use]
    pub fn contains_item(&self, item_id: &str) -> bool {
        self.item_index.contains_key(item_id)
    }

    #[must_use]
    pub fn bucket(&self, bucket_id: &str) -> Option<&Bucket> {
        self.bucket_index(bucket_id).map(|idx| &self.buckets[idx])
    }

    /// Order index of a bucket, `None` for an unknown id.
    #[must_use]
    pub fn bucket_index(&self, bucket_id: &str) -> Option<usize> {
        self.bucket_index.get(bucket_id).copied()
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Index of the last bucket (0 for a board without buckets).
    #[must_use]
    pub fn last_bucket_index(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    /// Bucket id at an order index.
    #[must_use]
    pub fn bucket_at(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    #[must_use]
    pub fn layer(&self, layer_id: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == layer_id)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Move one item to another bucket.
    ///
    /// The move is not checked for conflicts; run
    /// `forkmap_triage::conflict::analyze` first when that matters.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] when the item or bucket does not exist. The
    /// board is unchanged on error.
    #[instrument(skip(self))]
    pub fn move_item(&mut self, item_id: &str, bucket_id: &str) -> Result<AppliedMove, MoveError> {
        if !self.bucket_index.contains_key(bucket_id) {
            return Err(MoveError::UnknownBucket(bucket_id.to_string()));
        }
        let idx = *self
            .item_index
            .get(item_id)
            .ok_or_else(|| MoveError::UnknownItem(item_id.to_string()))?;

        let item = &mut self.items[idx];
        let from = std::mem::replace(&mut item.bucket, bucket_id.to_string());
        info!(item = item_id, from = %from, to = bucket_id, "item moved");

        Ok(AppliedMove {
            item_id: item_id.to_string(),
            from,
            to: bucket_id.to_string(),
        })
    }

    /// Put every item back into its original bucket.
    ///
    /// Returns the number of items that changed bucket.
    #[instrument(skip(self))]
    pub fn reset_to_original(&mut self) -> usize {
        let mut changed = 0;
        for item in &mut self.items {
            if item.is_moved() {
                item.bucket.clone_from(&item.original_bucket);
                changed += 1;
            }
        }
        info!(changed, "board reset to original buckets");
        changed
    }

    /// Ids of items currently outside their original bucket.
    #[must_use]
    pub fn modified_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.is_moved())
            .map(|item| item.id.as_str())
            .collect()
    }

    /// BLAKE3 hash of the bucket assignment, in declaration order.
    ///
    /// Changes exactly when some item changes bucket, so callers can use it
    /// to skip recomputing metrics for an unchanged board.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for item in &self.items {
            hasher.update(item.id.as_bytes());
            hasher.update(b"\x00");
            hasher.update(item.bucket.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Replace the item list wholesale. Callers must have validated it
    /// against the catalog (ids, order, layers, buckets).
    pub(crate) fn replace_items(&mut self, items: Vec<Item>) {
        debug_assert_eq!(items.len(), self.items.len());
        self.items = items;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
