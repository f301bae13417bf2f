/// Database module for storing subject offerings and semesters

mod memory;
mod types;

pub use memory::MemoryStore;
pub use types::{DbOffering, DbSemester, DbSemesterWeek};

use crate::error::Result;
use crate::model::{Semester, SubjectOffering};
use crate::serializer::serialize_offering;
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_timetable.sql");

/// Load/store access to persisted timetable records.
pub trait TimetableStore: Send + Sync {
    /// Inserts an offering, or replaces the class tree of an existing one with the same key.
    fn store_offering(&self, offering: &SubjectOffering) -> Result<()>;

    fn load_offering(&self, name: &str, year: i32, semester: u32) -> Result<Option<SubjectOffering>>;

    /// All offerings for a term, ordered by subject name.
    fn offerings_for_semester(&self, year: i32, semester: u32) -> Result<Vec<SubjectOffering>>;

    /// Inserts or replaces a semester together with its week dates.
    fn store_semester(&self, semester: &Semester) -> Result<()>;

    fn load_semester(&self, year: i32, semester: u32) -> Result<Option<Semester>>;

    /// Every semester flagged active, oldest first.
    fn active_semesters(&self) -> Result<Vec<Semester>>;
}

/// SQLite-backed timetable store.
pub struct TimetableDb {
    db: Mutex<Connection>,
}

impl TimetableDb {
    /// Opens (or creates) the database at `db_path` and initializes the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;

        info!("Opened timetable database at {}", db_path);

        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// In-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_weeks(db: &Connection, year: i32, semester: u32) -> Result<Vec<DbSemesterWeek>> {
        let mut stmt = db.prepare(
            "SELECT week, start_date FROM semester_weeks
             WHERE year = ?1 AND semester = ?2
             ORDER BY week",
        )?;

        let weeks = stmt
            .query_map((year, semester), |row| {
                Ok(DbSemesterWeek {
                    week: row.get(0)?,
                    start_date: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(weeks)
    }
}

impl TimetableStore for TimetableDb {
    fn store_offering(&self, offering: &SubjectOffering) -> Result<()> {
        let value = serialize_offering(offering)?;
        let classes = value["classes"].to_string();

        let db = self.conn();
        db.execute(
            "INSERT INTO subject_offerings (name, year, semester, classes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'), datetime('now'))
             ON CONFLICT (name, year, semester)
             DO UPDATE SET classes = excluded.classes, updated_at = excluded.updated_at",
            (offering.name(), offering.year(), offering.semester(), classes),
        )?;

        debug!(
            "Stored offering {} ({} S{})",
            offering.name(),
            offering.year(),
            offering.semester()
        );
        Ok(())
    }

    fn load_offering(&self, name: &str, year: i32, semester: u32) -> Result<Option<SubjectOffering>> {
        let db = self.conn();
        let row = db
            .query_row(
                "SELECT name, year, semester, classes FROM subject_offerings
                 WHERE name = ?1 AND year = ?2 AND semester = ?3",
                (name, year, semester),
                |row| {
                    Ok(DbOffering {
                        name: row.get(0)?,
                        year: row.get(1)?,
                        semester: row.get(2)?,
                        classes: row.get(3)?,
                    })
                },
            )
            .optional()?;

        row.map(DbOffering::into_offering).transpose()
    }

    fn offerings_for_semester(&self, year: i32, semester: u32) -> Result<Vec<SubjectOffering>> {
        let db = self.conn();
        let mut stmt = db.prepare(
            "SELECT name, year, semester, classes FROM subject_offerings
             WHERE year = ?1 AND semester = ?2
             ORDER BY name",
        )?;

        let rows = stmt
            .query_map((year, semester), |row| {
                Ok(DbOffering {
                    name: row.get(0)?,
                    year: row.get(1)?,
                    semester: row.get(2)?,
                    classes: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(DbOffering::into_offering).collect()
    }

    fn store_semester(&self, semester: &Semester) -> Result<()> {
        let mut db = self.conn();
        let tx = db.transaction()?;

        tx.execute(
            "INSERT INTO semesters (year, semester, active, created_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT (year, semester) DO UPDATE SET active = excluded.active",
            (semester.year(), semester.semester(), semester.active),
        )?;

        // Week dates are replaced wholesale
        tx.execute(
            "DELETE FROM semester_weeks WHERE year = ?1 AND semester = ?2",
            (semester.year(), semester.semester()),
        )?;

        for (week, start_date) in &semester.weeks {
            tx.execute(
                "INSERT INTO semester_weeks (year, semester, week, start_date)
                 VALUES (?1, ?2, ?3, ?4)",
                (semester.year(), semester.semester(), week, start_date),
            )?;
        }

        tx.commit()?;

        debug!(
            "Stored semester {} S{} with {} weeks",
            semester.year(),
            semester.semester(),
            semester.weeks.len()
        );
        Ok(())
    }

    fn load_semester(&self, year: i32, semester: u32) -> Result<Option<Semester>> {
        let db = self.conn();
        let row = db
            .query_row(
                "SELECT year, semester, active FROM semesters WHERE year = ?1 AND semester = ?2",
                (year, semester),
                |row| {
                    Ok(DbSemester {
                        year: row.get(0)?,
                        semester: row.get(1)?,
                        active: row.get(2)?,
                    })
                },
            )
            .optional()?;

        match row {
            Some(row) => {
                let weeks = Self::load_weeks(&db, year, semester)?;
                row.into_semester(weeks).map(Some)
            }
            None => Ok(None),
        }
    }

    fn active_semesters(&self) -> Result<Vec<Semester>> {
        let db = self.conn();
        let mut stmt = db.prepare(
            "SELECT year, semester, active FROM semesters
             WHERE active = 1
             ORDER BY year, semester",
        )?;

        let rows: Vec<DbSemester> = stmt
            .query_map([], |row| {
                Ok(DbSemester {
                    year: row.get(0)?,
                    semester: row.get(1)?,
                    active: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // For each semester, get its weeks
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let weeks = Self::load_weeks(&db, row.year, row.semester)?;
            result.push(row.into_semester(weeks)?);
        }

        Ok(result)
    }
}
