//! Board data model: buckets, layers, items, and the catalog that ties them
//! together.

pub mod bucket;
pub mod catalog;
pub mod item;

pub use bucket::{Bucket, BucketStatus, Layer};
pub use catalog::Catalog;
pub use item::{Complexity, Item, ItemType, ParseEnumError};
