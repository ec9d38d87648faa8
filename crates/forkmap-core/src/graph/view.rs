//! Read access to bucket assignments, real or simulated.
//!
//! Analyses never mutate the board to ask "what if this item were in that
//! bucket?". They read through a [`BoardView`] instead. [`Board`] answers
//! with its committed assignment; [`Overlay`] answers with a single
//! `item → bucket` override layered on top, so a simulated move has nothing
//! to roll back.

use crate::board::Board;
use crate::model::Item;

pub trait BoardView {
    /// The underlying committed board (catalog, edges, bucket order).
    fn board(&self) -> &Board;

    /// Current bucket id of `item_id` as seen through this view.
    fn bucket_of(&self, item_id: &str) -> Option<&str>;

    fn item(&self, item_id: &str) -> Option<&Item> {
        self.board().item(item_id)
    }

    fn items(&self) -> &[Item] {
        self.board().items()
    }

    /// Order index of the bucket `item_id` sits in, `None` when either the
    /// item or its bucket is unknown.
    fn bucket_index_of(&self, item_id: &str) -> Option<usize> {
        self.bucket_of(item_id)
            .and_then(|bucket| self.board().bucket_index(bucket))
    }
}

impl BoardView for Board {
    fn board(&self) -> &Board {
        self
    }

    fn bucket_of(&self, item_id: &str) -> Option<&str> {
        self.item(item_id).map(|item| item.bucket.as_str())
    }
}

/// A board with one item conceptually relocated.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    board: &'a Board,
    item_id: &'a str,
    bucket_id: &'a str,
}

impl<'a> Overlay<'a> {
    #[must_use]
    pub const fn new(board: &'a Board, item_id: &'a str, bucket_id: &'a str) -> Self {
        Self {
            board,
            item_id,
            bucket_id,
        }
    }

    #[must_use]
    pub const fn moved_item(&self) -> &'a str {
        self.item_id
    }

    #[must_use]
    pub const fn target_bucket(&self) -> &'a str {
        self.bucket_id
    }
}

impl BoardView for Overlay<'_> {
    fn board(&self) -> &Board {
        self.board
    }

    fn bucket_of(&self, item_id: &str) -> Option<&str> {
        if item_id == self.item_id && self.board.contains_item(item_id) {
            return Some(self.bucket_id);
        }
        self.board.bucket_of(item_id)
    }
}
