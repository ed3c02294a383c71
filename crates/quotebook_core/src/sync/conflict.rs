//! Pending category conflicts and their resolutions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ConflictId = Uuid;

/// A local and a remote quote sharing text but not category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: ConflictId,
    pub text: String,
    pub local_category: String,
    pub remote_category: String,
}

impl Conflict {
    pub fn new(
        text: impl Into<String>,
        local_category: impl Into<String>,
        remote_category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            local_category: local_category.into(),
            remote_category: remote_category.into(),
        }
    }

    /// Category the store should hold after applying `resolution`.
    pub fn chosen_category(&self, resolution: Resolution) -> &str {
        match resolution {
            Resolution::KeepLocal => &self.local_category,
            Resolution::KeepRemote => &self.remote_category,
        }
    }
}

/// User's pick for one conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    KeepLocal,
    KeepRemote,
}

impl Resolution {
    /// Parses `local`/`remote` (with optional `keep-`/`keep_` prefix).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let side = normalized
            .strip_prefix("keep-")
            .or_else(|| normalized.strip_prefix("keep_"))
            .unwrap_or(normalized.as_str());
        match side {
            "local" => Some(Self::KeepLocal),
            "remote" | "server" => Some(Self::KeepRemote),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepLocal => "keep_local",
            Self::KeepRemote => "keep_remote",
        }
    }
}

/// Conflicts awaiting a decision, in detection order.
#[derive(Debug, Clone, Default)]
pub struct ConflictSet {
    pending: Vec<Conflict>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a conflict unless one for the same text is already pending.
    pub fn push(&mut self, conflict: Conflict) -> bool {
        if self.pending.iter().any(|c| c.text == conflict.text) {
            return false;
        }
        self.pending.push(conflict);
        true
    }

    pub fn get(&self, id: ConflictId) -> Option<&Conflict> {
        self.pending.iter().find(|c| c.id == id)
    }

    /// Looks up a conflict by its 1-based position in the listing.
    pub fn by_position(&self, position: usize) -> Option<&Conflict> {
        position.checked_sub(1).and_then(|idx| self.pending.get(idx))
    }

    pub fn take(&mut self, id: ConflictId) -> Option<Conflict> {
        let idx = self.pending.iter().position(|c| c.id == id)?;
        Some(self.pending.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conflict> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Conflict, ConflictSet, Resolution};

    #[test]
    fn resolution_parse_accepts_both_spellings() {
        assert_eq!(Resolution::parse("local"), Some(Resolution::KeepLocal));
        assert_eq!(Resolution::parse("Keep-Remote"), Some(Resolution::KeepRemote));
        assert_eq!(Resolution::parse("keep_local"), Some(Resolution::KeepLocal));
        assert_eq!(Resolution::parse("both"), None);
    }

    #[test]
    fn push_ignores_second_conflict_for_same_text() {
        let mut set = ConflictSet::new();
        assert!(set.push(Conflict::new("X", "A", "B")));
        assert!(!set.push(Conflict::new("X", "A", "C")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn take_removes_once() {
        let mut set = ConflictSet::new();
        let conflict = Conflict::new("X", "A", "B");
        let id = conflict.id;
        set.push(conflict);

        assert_eq!(set.by_position(1).map(|c| c.id), Some(id));
        assert!(set.by_position(0).is_none());
        assert!(set.take(id).is_some());
        assert!(set.take(id).is_none());
        assert!(set.is_empty());
    }
}
