/// Database row types for timetable records
use crate::error::{Error, Result};
use crate::model::{Semester, Subject, SubjectOffering};
use crate::serializer::parse_classes;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct DbOffering {
    pub name: String,
    pub year: i32,
    pub semester: u32,
    pub classes: Option<String>, // JSON string
}

impl DbOffering {
    /// Converts the row into a model value, failing if the class tree is missing or invalid.
    pub fn into_offering(self) -> Result<SubjectOffering> {
        let json = self.classes.ok_or_else(|| {
            Error::serialization(format!(
                "offering {} ({} S{}) has no class data",
                self.name, self.year, self.semester
            ))
        })?;

        let subject = Subject {
            name: self.name,
            classes: parse_classes(&json)?,
        };
        Ok(SubjectOffering::new(subject, self.year, self.semester))
    }
}

#[derive(Debug, Clone)]
pub struct DbSemester {
    pub year: i32,
    pub semester: u32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct DbSemesterWeek {
    pub week: u32,
    pub start_date: Option<NaiveDate>,
}

impl DbSemester {
    /// Joins the semester row with its week rows.
    pub fn into_semester(self, weeks: Vec<DbSemesterWeek>) -> Result<Semester> {
        let mut map = BTreeMap::new();
        for row in weeks {
            let date = row.start_date.ok_or_else(|| {
                Error::serialization(format!(
                    "week {} of {} S{} has no start date",
                    row.week, self.year, self.semester
                ))
            })?;
            map.insert(row.week, date);
        }

        Ok(Semester::new(self.year, self.semester, self.active, map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_row_without_classes_fails() {
        let row = DbOffering {
            name: "COMP3506".to_string(),
            year: 2021,
            semester: 2,
            classes: None,
        };
        let err = row.into_offering().unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
        assert!(err.to_string().contains("COMP3506"));
    }

    #[test]
    fn test_offering_row_with_empty_class_list() {
        let row = DbOffering {
            name: "COMP3506".to_string(),
            year: 2021,
            semester: 2,
            classes: Some("[]".to_string()),
        };
        let offering = row.into_offering().unwrap();
        assert_eq!(offering.key(), ("COMP3506", 2021, 2));
        assert!(offering.classes.is_empty());
    }

    #[test]
    fn test_semester_week_without_date_fails() {
        let row = DbSemester {
            year: 2021,
            semester: 1,
            active: false,
        };
        let weeks = vec![DbSemesterWeek {
            week: 1,
            start_date: None,
        }];
        assert!(row.into_semester(weeks).is_err());
    }
}
