//! Snapshot export and atomic import.
//!
//! A [`Snapshot`] is the persisted shape of a board's items: enough to
//! reconstruct every bucket assignment and dependency edge. Export is
//! infallible. Import validates the whole payload against the catalog into a
//! staging list and only then swaps it in, so a rejected import leaves the
//! board exactly as it was.
//!
//! # Import Rules
//!
//! - The payload must have an `items` list and be valid JSON for this shape.
//! - Item ids must be unique and must match the catalog one-to-one.
//! - An item's layer must equal its catalog layer.
//! - Every bucket id must be a catalog bucket.
//! - Every dependency must name an item in the payload.
//! - The resulting dependency graph must be acyclic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::board::Board;
use crate::error::ImportError;
use crate::graph::build::DependencyGraph;
use crate::model::Item;

pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: String,
    pub items: Vec<Item>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

/// Informational export metadata. Ignored on import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub total_buckets: usize,
    #[serde(default)]
    pub modified_items: usize,
    #[serde(default)]
    pub fingerprint: String,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl Snapshot {
    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a snapshot payload.
    ///
    /// # Errors
    ///
    /// [`ImportError::MissingItems`] when there is no `items` list,
    /// [`ImportError::Malformed`] for anything else that does not parse.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| ImportError::Malformed(err.to_string()))?;

        match value.get("items") {
            None | Some(serde_json::Value::Null) => return Err(ImportError::MissingItems),
            Some(_) => {}
        }

        serde_json::from_value(value).map_err(|err| ImportError::Malformed(err.to_string()))
    }
}

impl Board {
    /// Export every item in declaration order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: default_version(),
            items: self.items().to_vec(),
            metadata: SnapshotMetadata {
                total_items: self.items().len(),
                total_buckets: self.bucket_count(),
                modified_items: self.modified_items().len(),
                fingerprint: self.fingerprint(),
            },
        }
    }

    /// Validate and apply a snapshot.
    ///
    /// Returns the number of items whose current bucket changed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImportError`] found; the board is untouched.
    #[instrument(skip(self, snapshot), fields(items = snapshot.items.len()))]
    pub fn import(&mut self, snapshot: Snapshot) -> Result<usize, ImportError> {
        let staged = match stage_import(self, snapshot) {
            Ok(staged) => staged,
            Err(err) => {
                warn!(code = %err.code(), error = %err, "snapshot import rejected");
                return Err(err);
            }
        };

        let moved = self
            .items()
            .iter()
            .zip(&staged)
            .filter(|(current, next)| current.bucket != next.bucket)
            .count();

        self.replace_items(staged);
        info!(moved, "snapshot imported");
        Ok(moved)
    }

    /// Parse and apply a JSON snapshot.
    ///
    /// # Errors
    ///
    /// See [`Snapshot::from_json`] and [`Board::import`].
    pub fn import_json(&mut self, text: &str) -> Result<usize, ImportError> {
        let snapshot = Snapshot::from_json(text).inspect_err(|err| {
            warn!(code = %err.code(), error = %err, "snapshot payload rejected");
        })?;
        self.import(snapshot)
    }
}

/// Validate `snapshot` against the catalog and return the new item list in
/// catalog order.
fn stage_import(board: &Board, snapshot: Snapshot) -> Result<Vec<Item>, ImportError> {
    let mut by_id: HashMap<String, Item> = HashMap::with_capacity(snapshot.items.len());
    for item in snapshot.items {
        if !board.contains_item(&item.id) {
            return Err(ImportError::UnknownItem(item.id));
        }
        if by_id.contains_key(&item.id) {
            return Err(ImportError::DuplicateItem(item.id));
        }
        by_id.insert(item.id.clone(), item);
    }

    let payload_ids: HashSet<&str> = by_id.keys().map(String::as_str).collect();
    let mut staged = Vec::with_capacity(board.items().len());

    for current in board.items() {
        let Some(incoming) = by_id.get(&current.id) else {
            return Err(ImportError::MissingItem(current.id.clone()));
        };

        if incoming.layer != current.layer {
            return Err(ImportError::LayerChanged {
                item_id: current.id.clone(),
                from: current.layer.clone(),
                to: incoming.layer.clone(),
            });
        }

        let mut next = incoming.clone();
        if next.original_bucket.is_empty() {
            next.original_bucket.clone_from(&current.original_bucket);
        }
        for bucket in [&next.bucket, &next.original_bucket] {
            if board.bucket_index(bucket).is_none() {
                return Err(ImportError::UnknownBucket {
                    item_id: next.id.clone(),
                    bucket: bucket.clone(),
                });
            }
        }
        if let Some(missing) = next
            .dependencies
            .iter()
            .find(|dep| !payload_ids.contains(dep.as_str()))
        {
            return Err(ImportError::DanglingDependency {
                item_id: next.id.clone(),
                missing_id: missing.clone(),
            });
        }

        staged.push(next);
    }

    let graph = DependencyGraph::from_items(&staged);
    if let Some(cycle) = graph.cycles().into_iter().next() {
        return Err(ImportError::Cycle(cycle));
    }

    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bucket, Layer};

    fn board() -> Board {
        Board::new(
            vec![Bucket::new("b0", "B0"), Bucket::new("b1", "B1")],
            vec![Layer::new("l", "L"), Layer::new("m", "M")],
            vec![
                Item::new("a", "A", "l", "b0"),
                Item::new("b", "B", "m", "b1").depends_on(["a"]),
            ],
            vec![],
        )
        .expect("board")
    }

    #[test]
    fn snapshot_carries_metadata() {
        let mut board = board();
        board.move_item("a", "b1").expect("move");
        let snap = board.snapshot();

        assert_eq!(snap.version, SNAPSHOT_VERSION);
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.metadata.total_buckets, 2);
        assert_eq!(snap.metadata.modified_items, 1);
        assert_eq!(snap.metadata.fingerprint, board.fingerprint());
    }

    #[test]
    fn import_applies_bucket_changes() {
        let mut source = board();
        source.move_item("a", "b1").expect("move");
        let json = source.snapshot().to_json().expect("json");

        let mut target = board();
        let moved = target.import_json(&json).expect("import");
        assert_eq!(moved, 1);
        assert_eq!(target, source);
    }

    #[test]
    fn missing_items_list_is_rejected() {
        let mut board = board();
        assert_eq!(
            board.import_json(r#"{"version": "1.0"}"#),
            Err(ImportError::MissingItems)
        );
        assert_eq!(
            board.import_json(r#"{"items": null}"#),
            Err(ImportError::MissingItems)
        );
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let mut board = board();
        assert!(matches!(
            board.import_json("not json"),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(
            board.import_json(r#"{"items": [{"id": 3}]}"#),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn layer_change_is_rejected() {
        let mut board = board();
        let before = board.clone();
        let mut snap = board.snapshot();
        snap.items[0].layer = "m".into();

        assert!(matches!(
            board.import(snap),
            Err(ImportError::LayerChanged { .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn catalog_mismatch_is_rejected() {
        let mut board = board();

        let mut extra = board.snapshot();
        extra.items.push(Item::new("z", "Z", "l", "b0"));
        assert_eq!(board.import(extra), Err(ImportError::UnknownItem("z".into())));

        let mut short = board.snapshot();
        short.items.pop();
        assert_eq!(board.import(short), Err(ImportError::MissingItem("b".into())));

        let mut dup = board.snapshot();
        let first = dup.items[0].clone();
        dup.items.push(first);
        assert_eq!(board.import(dup), Err(ImportError::DuplicateItem("a".into())));
    }

    #[test]
    fn unknown_bucket_is_rejected() {
        let mut board = board();
        let mut snap = board.snapshot();
        snap.items[1].bucket = "b9".into();
        assert!(matches!(
            board.import(snap),
            Err(ImportError::UnknownBucket { .. })
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let mut board = board();
        let before = board.clone();
        let mut snap = board.snapshot();
        snap.items[0].dependencies.push("b".into());

        assert_eq!(
            board.import(snap),
            Err(ImportError::Cycle(vec!["a".into(), "b".into()]))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn empty_original_bucket_keeps_catalog_value() {
        let mut board = board();
        let mut snap = board.snapshot();
        snap.items[0].original_bucket.clear();
        snap.items[0].bucket = "b1".into();

        board.import(snap).expect("import");
        let a = board.item("a").expect("a");
        assert_eq!(a.original_bucket, "b0");
        assert_eq!(board.modified_items(), vec!["a"]);
    }
}
