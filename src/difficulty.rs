use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::{report, DiagnosticsSink, MessageKey};

pub const DEFAULT_SWEET_SPOT_WIDTH: u32 = 60;
pub const DEFAULT_CURSOR_SPEED: u32 = 4;

/// Concrete tunables for one attempt. Immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub sweet_spot_width: u32,
    /// Units travelled per tick
    pub cursor_speed: u32,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            sweet_spot_width: DEFAULT_SWEET_SPOT_WIDTH,
            cursor_speed: DEFAULT_CURSOR_SPEED,
        }
    }
}

/// Difficulty identifier. The set is open; `normal` is the fallback of last resort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyId(String);

impl DifficultyId {
    pub const NORMAL: &'static str = "normal";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn normal() -> Self {
        Self::new(Self::NORMAL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DifficultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DifficultyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A table entry as written in configuration; either field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweet_spot_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_speed: Option<u32>,
}

impl DifficultyEntry {
    pub fn new(sweet_spot_width: u32, cursor_speed: u32) -> Self {
        Self {
            sweet_spot_width: Some(sweet_spot_width),
            cursor_speed: Some(cursor_speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifficultyTable {
    entries: BTreeMap<DifficultyId, DifficultyEntry>,
}

impl DifficultyTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, id: impl Into<DifficultyId>, entry: DifficultyEntry) -> Self {
        self.insert(id, entry);
        self
    }

    pub fn insert(&mut self, id: impl Into<DifficultyId>, entry: DifficultyEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn get(&self, id: &DifficultyId) -> Option<&DifficultyEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &DifficultyId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DifficultyId, &DifficultyEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self::empty()
            .with("chill", DifficultyEntry::new(100, 2))
            .with("easy", DifficultyEntry::new(80, 3))
            .with("normal", DifficultyEntry::new(60, 4))
            .with("hard", DifficultyEntry::new(40, 5))
            .with("insane", DifficultyEntry::new(20, 6))
    }
}

/// Map a requested difficulty to fully populated settings.
///
/// Never fails: every gap in the table is filled with a default and reported
/// to `diagnostics`. An unknown id falls back to `normal`; a table without
/// `normal` falls back to the hard-coded defaults. Zero is treated as unset.
pub fn resolve(
    requested: &DifficultyId,
    table: &DifficultyTable,
    diagnostics: &mut dyn DiagnosticsSink,
) -> DifficultySettings {
    let id = if table.contains(requested) {
        requested.clone()
    } else {
        report(diagnostics, MessageKey::NoSuchDifficulty);
        DifficultyId::normal()
    };

    let Some(entry) = table.get(&id) else {
        report(diagnostics, MessageKey::NoAssociatedSettings);
        return DifficultySettings::default();
    };

    let cursor_speed = match entry.cursor_speed.filter(|s| *s > 0) {
        Some(speed) => speed,
        None => {
            report(diagnostics, MessageKey::UndefinedCursorSpeed);
            DEFAULT_CURSOR_SPEED
        }
    };

    let sweet_spot_width = match entry.sweet_spot_width.filter(|w| *w > 0) {
        Some(width) => width,
        None => {
            report(diagnostics, MessageKey::UndefinedSweetSpot);
            DEFAULT_SWEET_SPOT_WIDTH
        }
    };

    log::debug!(
        "resolved difficulty '{requested}' as '{id}': width {sweet_spot_width}, speed {cursor_speed}"
    );

    DifficultySettings {
        sweet_spot_width,
        cursor_speed,
    }
}
