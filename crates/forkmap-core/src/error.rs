use std::fmt;

/// Machine-readable error codes for callers that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DuplicateId,
    UnknownItem,
    UnknownBucket,
    UnknownLayer,
    LayerChanged,
    DanglingDependency,
    CycleDetected,
    InvalidImport,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DuplicateId => "E2001",
            Self::UnknownItem => "E2002",
            Self::UnknownBucket => "E2003",
            Self::UnknownLayer => "E2004",
            Self::LayerChanged => "E2005",
            Self::DanglingDependency => "E3001",
            Self::CycleDetected => "E3002",
            Self::InvalidImport => "E4001",
        }
    }

    /// Short human-facing summary for logs and status lines.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DuplicateId => "Duplicate id in catalog",
            Self::UnknownItem => "Item not found",
            Self::UnknownBucket => "Bucket not found",
            Self::UnknownLayer => "Layer not found",
            Self::LayerChanged => "Item layer cannot change",
            Self::DanglingDependency => "Dependency references a missing item",
            Self::CycleDetected => "Dependency cycle",
            Self::InvalidImport => "Invalid snapshot payload",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .forkmap/config.toml and retry."),
            Self::DuplicateId => Some("Give every bucket, layer, and item a unique id."),
            Self::UnknownItem | Self::UnknownBucket | Self::UnknownLayer => None,
            Self::LayerChanged => Some("Items may only move between buckets within their layer."),
            Self::DanglingDependency => {
                Some("Remove the dependency or add the missing item to the catalog.")
            }
            Self::CycleDetected => Some("Remove a dependency edge to keep the graph acyclic."),
            Self::InvalidImport => Some("Export a fresh snapshot and retry the import."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors from building a [`crate::Board`] out of catalog parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate bucket id '{0}'")]
    DuplicateBucket(String),

    #[error("duplicate layer id '{0}'")]
    DuplicateLayer(String),

    #[error("duplicate item id '{0}'")]
    DuplicateItem(String),

    #[error("item '{item_id}' references unknown layer '{layer}'")]
    UnknownLayer { item_id: String, layer: String },

    #[error("item '{item_id}' references unknown bucket '{bucket}'")]
    UnknownBucket { item_id: String, bucket: String },

    #[error("malformed catalog: {0}")]
    Malformed(String),
}

impl CatalogError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateBucket(_) | Self::DuplicateLayer(_) | Self::DuplicateItem(_) => {
                ErrorCode::DuplicateId
            }
            Self::UnknownLayer { .. } => ErrorCode::UnknownLayer,
            Self::UnknownBucket { .. } => ErrorCode::UnknownBucket,
            Self::Malformed(_) => ErrorCode::InvalidImport,
        }
    }
}

/// Errors from a single bucket move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("unknown bucket '{0}'")]
    UnknownBucket(String),
}

impl MoveError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownItem(_) => ErrorCode::UnknownItem,
            Self::UnknownBucket(_) => ErrorCode::UnknownBucket,
        }
    }
}

/// Reasons a snapshot import is rejected. A rejected import never touches
/// the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("snapshot is not valid JSON: {0}")]
    Malformed(String),

    #[error("snapshot has no item list")]
    MissingItems,

    #[error("snapshot lists item '{0}' more than once")]
    DuplicateItem(String),

    #[error("snapshot item '{0}' is not part of the catalog")]
    UnknownItem(String),

    #[error("catalog item '{0}' is missing from the snapshot")]
    MissingItem(String),

    #[error("snapshot moves item '{item_id}' from layer '{from}' to '{to}'")]
    LayerChanged {
        item_id: String,
        from: String,
        to: String,
    },

    #[error("snapshot item '{item_id}' references unknown bucket '{bucket}'")]
    UnknownBucket { item_id: String, bucket: String },

    #[error("snapshot item '{item_id}' depends on missing item '{missing_id}'")]
    DanglingDependency { item_id: String, missing_id: String },

    #[error("snapshot dependencies form a cycle: {}", .0.join(" → "))]
    Cycle(Vec<String>),
}

impl ImportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed(_) | Self::MissingItems | Self::DuplicateItem(_) => {
                ErrorCode::InvalidImport
            }
            Self::UnknownItem(_) | Self::MissingItem(_) => ErrorCode::UnknownItem,
            Self::LayerChanged { .. } => ErrorCode::LayerChanged,
            Self::UnknownBucket { .. } => ErrorCode::UnknownBucket,
            Self::DanglingDependency { .. } => ErrorCode::DanglingDependency,
            Self::Cycle(_) => ErrorCode::CycleDetected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, ImportError};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::DuplicateId,
            ErrorCode::UnknownItem,
            ErrorCode::UnknownBucket,
            ErrorCode::UnknownLayer,
            ErrorCode::LayerChanged,
            ErrorCode::DanglingDependency,
            ErrorCode::CycleDetected,
            ErrorCode::InvalidImport,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::DanglingDependency.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn cycle_error_renders_path() {
        let err = ImportError::Cycle(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "snapshot dependencies form a cycle: a → b → a");
        assert_eq!(err.code(), ErrorCode::CycleDetected);
    }
}
