use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The two kinds of roadmap item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A flagship item, subject to per-bucket-per-layer capacity limits.
    Headliner,
    #[default]
    Regular,
}

impl ItemType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Headliner => "headliner",
            Self::Regular => "regular",
        }
    }
}

/// Four-step complexity estimate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
}

impl Complexity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }

    /// Load weight used for bucket totals and the overload check.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::VeryHigh => 4,
        }
    }

    /// Bonus added to an item's criticality score.
    #[must_use]
    pub const fn criticality_bonus(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 5,
            Self::High => 10,
            Self::VeryHigh => 15,
        }
    }

    /// Contribution of one item to its bucket's risk score.
    #[must_use]
    pub const fn risk(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 4,
            Self::VeryHigh => 6,
        }
    }
}

/// A schedulable roadmap item.
///
/// `bucket` is the only field that changes at runtime, and only through
/// [`crate::Board`] move operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub layer: String,
    /// Bucket the item is currently scheduled in.
    pub bucket: String,
    /// Bucket the item was declared in. Left empty in a catalog file, it is
    /// filled from `bucket` when the board is built.
    #[serde(default)]
    pub original_bucket: String,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub complexity: Complexity,
    /// Ids of the items this item depends on, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Item {
    /// Create a regular, medium-complexity item with no dependencies whose
    /// original bucket is `bucket`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        layer: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        let bucket = bucket.into();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            layer: layer.into(),
            original_bucket: bucket.clone(),
            bucket,
            item_type: ItemType::Regular,
            complexity: Complexity::Medium,
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub const fn headliner(mut self) -> Self {
        self.item_type = ItemType::Headliner;
        self
    }

    #[must_use]
    pub const fn complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    #[must_use]
    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    #[must_use]
    pub fn is_headliner(&self) -> bool {
        self.item_type == ItemType::Headliner
    }

    /// Whether the item's current bucket differs from its declared one.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        self.bucket != self.original_bucket
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace('_', "-")
}

impl FromStr for ItemType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "headliner" => Ok(Self::Headliner),
            "regular" => Ok(Self::Regular),
            _ => Err(ParseEnumError {
                expected: "item type",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Complexity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "very-high" => Ok(Self::VeryHigh),
            _ => Err(ParseEnumError {
                expected: "complexity",
                got: s.to_string(),
            }),
        }
    }
}
