/// Timetable model types: subject → class → stream → session
use crate::time::TimeValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Highest weekday index (Friday).
pub const LAST_WEEKDAY: u8 = 4;

/// When a session takes place.
///
/// Both forms use the `day` key on the wire: an integer weekday for
/// recurring sessions, an ISO date string for one-off sessions. A one-off
/// session carrying `weeks` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawOccurrence")]
pub enum Occurrence {
    /// Weekly on `day` (0 = Monday .. 4 = Friday)
    Recurring {
        day: u8,
        /// Weeks of semester the session runs in; falls back to the stream's set
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weeks: Option<BTreeSet<u32>>,
    },
    /// A single meeting on a calendar date
    OneOff {
        #[serde(rename = "day")]
        date: NaiveDate,
    },
}

/// Wire form before the one-off/weeks check.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOccurrence {
    Recurring {
        day: u8,
        #[serde(default)]
        weeks: Option<BTreeSet<u32>>,
    },
    OneOff {
        day: NaiveDate,
        #[serde(default)]
        weeks: Option<BTreeSet<u32>>,
    },
}

impl TryFrom<RawOccurrence> for Occurrence {
    type Error = String;

    fn try_from(raw: RawOccurrence) -> Result<Self, Self::Error> {
        match raw {
            RawOccurrence::Recurring { day, weeks } => Ok(Occurrence::Recurring { day, weeks }),
            RawOccurrence::OneOff { day, weeks: None } => Ok(Occurrence::OneOff { date: day }),
            RawOccurrence::OneOff { day, weeks: Some(_) } => {
                Err(format!("one-off session on {day} cannot list weeks"))
            }
        }
    }
}

impl Occurrence {
    pub fn weekly(day: u8) -> Self {
        Occurrence::Recurring { day, weeks: None }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Occurrence::Recurring { .. })
    }
}

/// One concrete meeting: when, from/to, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub start_time: TimeValue,
    pub end_time: TimeValue,
    pub location: String,
}

impl Session {
    /// Session length in minutes (zero if the times are inverted).
    pub fn length_minutes(&self) -> u64 {
        self.end_time
            .total_minutes()
            .saturating_sub(self.start_time.total_minutes())
    }

    /// Checks the weekday range and that the session ends after it starts.
    pub fn is_well_formed(&self) -> bool {
        let day_ok = match self.occurrence {
            Occurrence::Recurring { day, .. } => day <= LAST_WEEKDAY,
            Occurrence::OneOff { .. } => true,
        };
        day_ok && self.end_time > self.start_time
    }
}

/// One parallel offering of a class, e.g. a single tutorial group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stream {
    /// Default week set for the stream's recurring sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<BTreeSet<u32>>,
    #[serde(rename = "classes")]
    pub sessions: Vec<Session>,
}

/// An activity type within a subject ("L", "T", "P", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub streams: Vec<Stream>,
}

/// A subject's timetable without a term attached, as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub classes: Vec<Class>,
}

/// A subject offered in a particular year and semester.
///
/// `(name, year, semester)` is the record's identity and cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectOffering {
    name: String,
    year: i32,
    semester: u32,
    pub classes: Vec<Class>,
}

impl SubjectOffering {
    pub fn new(subject: Subject, year: i32, semester: u32) -> Self {
        Self {
            name: subject.name,
            year,
            semester,
            classes: subject.classes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn semester(&self) -> u32 {
        self.semester
    }

    /// The primary key `(name, year, semester)`.
    pub fn key(&self) -> (&str, i32, u32) {
        (&self.name, self.year, self.semester)
    }

    /// Drops the term, keeping the timetable.
    pub fn into_subject(self) -> Subject {
        Subject {
            name: self.name,
            classes: self.classes,
        }
    }
}
