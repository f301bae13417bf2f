//! In-memory timetable store.

use super::TimetableStore;
use crate::error::Result;
use crate::model::{Semester, SubjectOffering};
use crate::serializer::serialize_offering;
use dashmap::DashMap;

type OfferingKey = (String, i32, u32);

/// Thread-safe store backed by concurrent maps; contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    offerings: DashMap<OfferingKey, SubjectOffering>,
    semesters: DashMap<(i32, u32), Semester>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored offerings.
    pub fn offering_count(&self) -> usize {
        self.offerings.len()
    }
}

impl TimetableStore for MemoryStore {
    fn store_offering(&self, offering: &SubjectOffering) -> Result<()> {
        // Same acceptance rules as the sqlite store
        serialize_offering(offering)?;

        let key = (
            offering.name().to_string(),
            offering.year(),
            offering.semester(),
        );
        self.offerings.insert(key, offering.clone());
        Ok(())
    }

    fn load_offering(&self, name: &str, year: i32, semester: u32) -> Result<Option<SubjectOffering>> {
        let key = (name.to_string(), year, semester);
        Ok(self.offerings.get(&key).map(|entry| entry.value().clone()))
    }

    fn offerings_for_semester(&self, year: i32, semester: u32) -> Result<Vec<SubjectOffering>> {
        let mut offerings: Vec<SubjectOffering> = self
            .offerings
            .iter()
            .filter(|entry| entry.year() == year && entry.semester() == semester)
            .map(|entry| entry.value().clone())
            .collect();

        offerings.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(offerings)
    }

    fn store_semester(&self, semester: &Semester) -> Result<()> {
        self.semesters.insert(semester.key(), semester.clone());
        Ok(())
    }

    fn load_semester(&self, year: i32, semester: u32) -> Result<Option<Semester>> {
        Ok(self
            .semesters
            .get(&(year, semester))
            .map(|entry| entry.value().clone()))
    }

    fn active_semesters(&self) -> Result<Vec<Semester>> {
        let mut active: Vec<Semester> = self
            .semesters
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.value().clone())
            .collect();

        active.sort_by_key(|s| s.key());
        Ok(active)
    }
}
