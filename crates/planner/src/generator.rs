//! Synthetic timetable generation.
//!
//! Expands a randomly chosen archetype group into a full subject tree:
//! one class per archetype, a sampled number of streams per class and a
//! fixed number of sessions per stream.

use crate::catalog::{ArchetypeCatalog, ArchetypeSpec};
use crate::model::{Class, Occurrence, Session, Stream, Subject, SubjectOffering, LAST_WEEKDAY};
use crate::time::{add_duration, Duration, TimeValue};
use rand::Rng;
use tracing::debug;

/// Letters in a subject code, followed by the same number of digits.
const SUBJECT_CODE_LETTERS: usize = 4;
const SUBJECT_CODE_DIGITS: usize = 4;

/// Earliest and latest hour a generated session may start at.
const FIRST_START_HOUR: u32 = 8;
const LAST_START_HOUR: u32 = 18;

const LOCATION_LENGTH: usize = 20;
const LOCATION_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ";

/// Generates random subjects from an archetype catalog.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    catalog: &'a ArchetypeCatalog,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a ArchetypeCatalog) -> Self {
        Self { catalog }
    }

    /// Generator over the built-in catalog.
    pub fn builtin() -> Generator<'static> {
        Generator::new(ArchetypeCatalog::builtin())
    }

    pub fn generate_subject<R: Rng + ?Sized>(&self, rng: &mut R) -> Subject {
        let group = self.catalog.choose_group(rng);
        let name = generate_subject_code(rng);

        debug!("Generating subject {} from archetype group {}", name, group.name);

        let classes = group
            .archetypes
            .iter()
            .map(|entry| generate_class(entry, rng))
            .collect();

        Subject { name, classes }
    }

    pub fn generate_offering<R: Rng + ?Sized>(
        &self,
        year: i32,
        semester: u32,
        rng: &mut R,
    ) -> SubjectOffering {
        SubjectOffering::new(self.generate_subject(rng), year, semester)
    }
}

/// Random subject from the built-in catalog using the thread-local RNG.
pub fn generate_subject() -> Subject {
    Generator::builtin().generate_subject(&mut rand::thread_rng())
}

/// Random subject offered in the given term.
pub fn generate_offering(year: i32, semester: u32) -> SubjectOffering {
    Generator::builtin().generate_offering(year, semester, &mut rand::thread_rng())
}

/// A class named after `entry` with a sampled number of streams.
pub fn generate_class<R: Rng + ?Sized>(entry: &ArchetypeSpec, rng: &mut R) -> Class {
    let stream_count = entry.stream_count.resolve(rng);
    let streams = (0..stream_count)
        .map(|_| generate_stream(entry, rng))
        .collect();

    Class {
        name: entry.name.clone(),
        streams,
    }
}

/// A stream with `entry.sessions_per_stream` independently placed sessions.
pub fn generate_stream<R: Rng + ?Sized>(entry: &ArchetypeSpec, rng: &mut R) -> Stream {
    let sessions = (0..entry.sessions_per_stream)
        .map(|_| generate_session(entry.session_length, rng))
        .collect();

    Stream {
        weeks: None,
        sessions,
    }
}

/// A weekly session of the given length on a random weekday.
///
/// Starts on the hour between 8:00 and 18:00, or at half past one time in ten.
pub fn generate_session<R: Rng + ?Sized>(length: Duration, rng: &mut R) -> Session {
    let day = rng.gen_range(0..=LAST_WEEKDAY);
    let hours = rng.gen_range(FIRST_START_HOUR..=LAST_START_HOUR);
    let minutes = if rng.gen_ratio(1, 10) { 30 } else { 0 };
    let start_time = TimeValue::from_total_minutes(u64::from(hours * 60 + minutes));

    Session {
        occurrence: Occurrence::weekly(day),
        start_time,
        end_time: add_duration(start_time, length),
        location: generate_location(rng),
    }
}

/// Four uppercase letters followed by four digits, e.g. "QZKA0417".
pub fn generate_subject_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(SUBJECT_CODE_LETTERS + SUBJECT_CODE_DIGITS);
    for _ in 0..SUBJECT_CODE_LETTERS {
        code.push(char::from(rng.gen_range(b'A'..=b'Z')));
    }
    for _ in 0..SUBJECT_CODE_DIGITS {
        code.push(char::from(rng.gen_range(b'0'..=b'9')));
    }
    code
}

/// Stand-in venue name: letters and spaces, fixed length.
pub fn generate_location<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..LOCATION_LENGTH)
        .map(|_| char::from(LOCATION_CHARS[rng.gen_range(0..LOCATION_CHARS.len())]))
        .collect()
}
