//! Serializable catalog definition: the full set of buckets, layers, goals,
//! and items a board is built from at startup.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::CatalogError;

use super::{Bucket, Item, Layer};

/// Startup definition of a board.
///
/// Buckets are listed in schedule order; the position in `buckets` is the
/// bucket's order index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub buckets: Vec<Bucket>,
    pub layers: Vec<Layer>,
    /// Ids of the goal items used for bottleneck measurement.
    #[serde(default)]
    pub goals: Vec<String>,
    pub items: Vec<Item>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] when the text is not a valid
    /// catalog document.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|err| CatalogError::Malformed(err.to_string()))
    }

    /// Build the board described by this catalog.
    ///
    /// # Errors
    ///
    /// See [`Board::new`].
    pub fn into_board(self) -> Result<Board, CatalogError> {
        Board::new(self.buckets, self.layers, self.items, self.goals)
    }
}
