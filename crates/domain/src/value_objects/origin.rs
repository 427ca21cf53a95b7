//! Where a bonus record came from.

use serde::{Deserialize, Serialize};

/// Origin of a bonus record (bonus slot, extra use, spell bonus).
///
/// Scanned records belong to exactly one note file; a rescan of that file
/// replaces them. Manual records are never touched by a rescan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntryOrigin {
    /// Added by the user.
    #[default]
    Manual,
    /// Extracted from a note during a scan.
    #[serde(rename_all = "camelCase")]
    Scanned { source_file: String },
}

impl EntryOrigin {
    pub fn scanned(source_file: impl Into<String>) -> Self {
        Self::Scanned {
            source_file: source_file.into(),
        }
    }

    pub fn is_scanned(&self) -> bool {
        matches!(self, Self::Scanned { .. })
    }

    /// True when this record was scanned from `file`.
    pub fn is_from_file(&self, file: &str) -> bool {
        match self {
            Self::Scanned { source_file } => source_file == file,
            Self::Manual => false,
        }
    }

    pub fn source_file(&self) -> Option<&str> {
        match self {
            Self::Scanned { source_file } => Some(source_file),
            Self::Manual => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_file_matching() {
        let scanned = EntryOrigin::scanned("Items/Ring.md");
        assert!(scanned.is_scanned());
        assert!(scanned.is_from_file("Items/Ring.md"));
        assert!(!scanned.is_from_file("Items/Cloak.md"));
        assert!(!EntryOrigin::Manual.is_from_file("Items/Ring.md"));
    }

    #[test]
    fn origin_serialization_shape() {
        let json = serde_json::to_value(EntryOrigin::scanned("a.md")).unwrap();
        assert_eq!(json["kind"], "scanned");
        assert_eq!(json["sourceFile"], "a.md");
        let manual: EntryOrigin = serde_json::from_str(r#"{"kind":"manual"}"#).unwrap();
        assert_eq!(manual, EntryOrigin::Manual);
    }
}
