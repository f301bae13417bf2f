//! Archetype catalog: the subject "shapes" the generator samples from.

use crate::error::{Error, Result};
use crate::time::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Upper limit on streams per class.
pub const MAX_STREAMS: u32 = 64;
/// Upper limit on sessions per stream (one a day, twice a day).
pub const MAX_SESSIONS_PER_STREAM: u32 = 10;
/// Longest session a catalog may describe, in minutes.
pub const MAX_SESSION_MINUTES: u64 = 12 * 60;

/// Either a fixed count or an inclusive `{min, max}` range to draw from.
///
/// In JSON a fixed count is a bare integer and a range is an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixedOrRange {
    Fixed(u32),
    Range { min: u32, max: u32 },
}

impl FixedOrRange {
    /// Resolves to a concrete count, drawing uniformly from `[min, max]` for ranges.
    ///
    /// Panics on an inverted range; catalogs reject those in [`ArchetypeCatalog::new`].
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match *self {
            FixedOrRange::Fixed(n) => n,
            FixedOrRange::Range { min, max } => rng.gen_range(min..=max),
        }
    }

    /// Smallest and largest value `resolve` can return.
    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            FixedOrRange::Fixed(n) => (n, n),
            FixedOrRange::Range { min, max } => (min, max),
        }
    }
}

/// One class activity shape, e.g. a lecture with one stream meeting three times a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeSpec {
    /// Short activity code used as the class name ("L", "T", "P", ...)
    pub name: String,
    pub stream_count: FixedOrRange,
    pub session_length: Duration,
    pub sessions_per_stream: u32,
}

impl ArchetypeSpec {
    pub fn new(
        name: &str,
        stream_count: FixedOrRange,
        session_length: Duration,
        sessions_per_stream: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            stream_count,
            session_length,
            sessions_per_stream,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::configuration("archetype name is empty"));
        }

        let (min, max) = self.stream_count.bounds();
        if min > max {
            return Err(Error::configuration(format!(
                "archetype {}: stream count range min {} exceeds max {}",
                self.name, min, max
            )));
        }
        if min == 0 {
            return Err(Error::configuration(format!(
                "archetype {}: stream count may resolve to zero",
                self.name
            )));
        }
        if max > MAX_STREAMS {
            return Err(Error::configuration(format!(
                "archetype {}: stream count {} exceeds {}",
                self.name, max, MAX_STREAMS
            )));
        }
        if self.session_length.is_zero() {
            return Err(Error::configuration(format!(
                "archetype {}: session length is zero",
                self.name
            )));
        }
        if self.session_length.total_minutes() > MAX_SESSION_MINUTES {
            return Err(Error::configuration(format!(
                "archetype {}: session length {} minutes exceeds {}",
                self.name,
                self.session_length.total_minutes(),
                MAX_SESSION_MINUTES
            )));
        }
        if self.sessions_per_stream == 0 {
            return Err(Error::configuration(format!(
                "archetype {}: sessions per stream is zero",
                self.name
            )));
        }
        if self.sessions_per_stream > MAX_SESSIONS_PER_STREAM {
            return Err(Error::configuration(format!(
                "archetype {}: {} sessions per stream exceeds {}",
                self.name, self.sessions_per_stream, MAX_SESSIONS_PER_STREAM
            )));
        }

        Ok(())
    }
}

/// A set of archetypes that together make up one kind of subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeGroup {
    pub name: String,
    pub archetypes: Vec<ArchetypeSpec>,
}

/// Read-only collection of archetype groups.
///
/// Every entry has been validated, so sampling from it cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeCatalog {
    groups: Vec<ArchetypeGroup>,
}

static BUILTIN: LazyLock<ArchetypeCatalog> = LazyLock::new(|| {
    ArchetypeCatalog::new(builtin_groups()).expect("built-in archetype catalog is valid")
});

impl ArchetypeCatalog {
    /// Builds a catalog, rejecting any malformed group or entry.
    pub fn new(groups: Vec<ArchetypeGroup>) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::configuration("archetype catalog has no groups"));
        }

        for group in &groups {
            if group.archetypes.is_empty() {
                return Err(Error::configuration(format!(
                    "archetype group {} has no archetypes",
                    group.name
                )));
            }
            for spec in &group.archetypes {
                spec.validate()?;
            }
        }

        Ok(Self { groups })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> &'static ArchetypeCatalog {
        &BUILTIN
    }

    /// Parses a catalog from a JSON array of groups.
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<ArchetypeGroup> = serde_json::from_str(json)
            .map_err(|e| Error::configuration(format!("invalid archetype catalog: {e}")))?;
        Self::new(groups)
    }

    /// Loads a catalog from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded {} archetype groups from {}",
            catalog.groups.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn groups(&self) -> &[ArchetypeGroup] {
        &self.groups
    }

    /// Picks one group uniformly at random.
    pub fn choose_group<R: Rng + ?Sized>(&self, rng: &mut R) -> &ArchetypeGroup {
        // Non-empty by construction
        &self.groups[rng.gen_range(0..self.groups.len())]
    }
}

fn builtin_groups() -> Vec<ArchetypeGroup> {
    use FixedOrRange::{Fixed, Range};

    vec![
        ArchetypeGroup {
            name: "lecture-tutorial-practical".to_string(),
            archetypes: vec![
                ArchetypeSpec::new("L", Fixed(1), Duration::from_hours(1), 3),
                ArchetypeSpec::new("T", Range { min: 4, max: 8 }, Duration::from_hours(1), 1),
                ArchetypeSpec::new("P", Range { min: 4, max: 8 }, Duration::from_hours(1), 1),
            ],
        },
        ArchetypeGroup {
            name: "workshop-lecture".to_string(),
            archetypes: vec![
                ArchetypeSpec::new("U", Range { min: 2, max: 5 }, Duration::from_hours(2), 1),
                ArchetypeSpec::new("L", Fixed(1), Duration::from_hours(2), 1),
            ],
        },
        ArchetypeGroup {
            name: "lecture-practical".to_string(),
            archetypes: vec![
                ArchetypeSpec::new("L", Range { min: 1, max: 2 }, Duration::from_hours(1), 2),
                ArchetypeSpec::new("P", Range { min: 3, max: 6 }, Duration::from_hours(1), 1),
            ],
        },
    ]
}
