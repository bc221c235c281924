//! Changelog entries and identifier generation.
//!
//! Every scheduling decision is explained by one or more [`ChangelogEntry`]
//! values. Entry identifiers come from an [`IdGenerator`] supplied by the
//! caller so that test suites can assert exact identifiers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a changelog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangelogLevel {
    /// Initiative fully allocated.
    Placed,
    /// Initiative placed (or attempted) outside its target window.
    WindowMissed,
    /// Effort left unscheduled, or the initiative references a missing team.
    Conflict,
    /// Excluded by a dependency cycle or an unsatisfied dependency.
    Blocked,
    /// Informational notice (pass summary).
    Info,
}

impl ChangelogLevel {
    /// Upper-case tag, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangelogLevel::Placed => "PLACED",
            ChangelogLevel::WindowMissed => "WINDOW_MISSED",
            ChangelogLevel::Conflict => "CONFLICT",
            ChangelogLevel::Blocked => "BLOCKED",
            ChangelogLevel::Info => "INFO",
        }
    }

    /// Lower-case prefix used for generated identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            ChangelogLevel::Placed => "placed",
            ChangelogLevel::WindowMissed => "window-missed",
            ChangelogLevel::Conflict => "conflict",
            ChangelogLevel::Blocked => "blocked",
            ChangelogLevel::Info => "info",
        }
    }
}

impl fmt::Display for ChangelogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One explanation in the changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    /// Entry identifier.
    pub id: String,
    /// Severity.
    pub level: ChangelogLevel,
    /// Human-readable explanation.
    pub message: String,
    /// Initiative the entry concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_id: Option<String>,
}

/// Source of changelog entry identifiers.
pub trait IdGenerator {
    /// Returns the next identifier for an entry with the given prefix.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Deterministic `"{prefix}-{n}"` identifiers with one global counter.
///
/// ```
/// use u_roadmap::models::{IdGenerator, SequentialIds};
///
/// let mut ids = SequentialIds::new();
/// assert_eq!(ids.next_id("placed"), "placed-1");
/// assert_eq!(ids.next_id("info"), "info-2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Starts counting at 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random-looking `"{prefix}-xxxxxx"` identifiers, reproducible per seed.
#[derive(Debug, Clone)]
pub struct SeededIds {
    rng: StdRng,
}

impl SeededIds {
    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for SeededIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let suffix: String = (0..6)
            .map(|_| BASE36[self.rng.random_range(0..BASE36.len())] as char)
            .collect();
        format!("{prefix}-{suffix}")
    }
}

/// Ordered changelog under construction.
///
/// Borrows the identifier source for the duration of one scheduling pass.
pub struct Changelog<'a> {
    entries: Vec<ChangelogEntry>,
    ids: &'a mut dyn IdGenerator,
}

impl<'a> Changelog<'a> {
    /// Creates an empty changelog drawing identifiers from `ids`.
    pub fn new(ids: &'a mut dyn IdGenerator) -> Self {
        Self {
            entries: Vec::new(),
            ids,
        }
    }

    /// Appends an entry about a specific initiative.
    pub fn record(
        &mut self,
        level: ChangelogLevel,
        initiative_id: &str,
        message: impl Into<String>,
    ) {
        self.push(level, Some(initiative_id.to_string()), message.into());
    }

    /// Appends an entry not tied to one initiative.
    pub fn notice(&mut self, level: ChangelogLevel, message: impl Into<String>) {
        self.push(level, None, message.into());
    }

    fn push(&mut self, level: ChangelogLevel, initiative_id: Option<String>, message: String) {
        let id = self.ids.next_id(level.id_prefix());
        self.entries.push(ChangelogEntry {
            id,
            level,
            message,
            initiative_id,
        });
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the builder, returning entries in recording order.
    pub fn into_entries(self) -> Vec<ChangelogEntry> {
        self.entries
    }
}
