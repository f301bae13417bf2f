//! Canonical JSON rendering of timetable model values.
//!
//! The `serialize_*` functions never mutate their input and only fail when
//! a required field is missing. The `parse_*` functions are the inverse and
//! additionally reject sessions that break the model invariants.

use crate::error::{Error, Result};
use crate::model::{Class, Semester, Subject, SubjectOffering};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn serialize_subject(subject: &Subject) -> Result<Value> {
    check_tree(&subject.name, &subject.classes)?;
    to_value(subject)
}

/// Subject shape plus `year` and `semester`.
pub fn serialize_offering(offering: &SubjectOffering) -> Result<Value> {
    check_tree(offering.name(), &offering.classes)?;
    to_value(offering)
}

/// Week start dates are rendered as ISO date strings keyed by week index.
pub fn serialize_semester(semester: &Semester) -> Result<Value> {
    to_value(semester)
}

pub fn parse_subject(value: Value) -> Result<Subject> {
    let subject: Subject = from_value(value)?;
    check_tree(&subject.name, &subject.classes)?;
    check_sessions(&subject.classes)?;
    Ok(subject)
}

pub fn parse_offering(value: Value) -> Result<SubjectOffering> {
    let offering: SubjectOffering = from_value(value)?;
    check_tree(offering.name(), &offering.classes)?;
    check_sessions(&offering.classes)?;
    Ok(offering)
}

pub fn parse_semester(value: Value) -> Result<Semester> {
    from_value(value)
}

/// Parses a stored class list (the `classes` array of a subject).
pub fn parse_classes(json: &str) -> Result<Vec<Class>> {
    let classes: Vec<Class> = serde_json::from_str(json)
        .map_err(|e| Error::serialization(format!("invalid class list: {e}")))?;
    check_sessions(&classes)?;
    Ok(classes)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::serialization(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::serialization(e.to_string()))
}

fn check_tree(name: &str, classes: &[Class]) -> Result<()> {
    if name.is_empty() {
        return Err(Error::serialization("subject name is missing"));
    }
    if let Some(index) = classes.iter().position(|c| c.name.is_empty()) {
        return Err(Error::serialization(format!(
            "class {index} of subject {name} has no name"
        )));
    }
    Ok(())
}

fn check_sessions(classes: &[Class]) -> Result<()> {
    for class in classes {
        for stream in &class.streams {
            if let Some(session) = stream.sessions.iter().find(|s| !s.is_well_formed()) {
                return Err(Error::serialization(format!(
                    "class {} has a malformed session ({} to {})",
                    class.name, session.start_time, session.end_time
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::model::{Occurrence, Session, Stream};
    use crate::time::TimeValue;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn infs3208() -> Subject {
        Subject {
            name: "INFS3208".to_string(),
            classes: vec![Class {
                name: "L".to_string(),
                streams: vec![Stream {
                    weeks: None,
                    sessions: vec![Session {
                        occurrence: Occurrence::weekly(4),
                        start_time: TimeValue::at(12),
                        end_time: TimeValue::at(14),
                        location: "Forgan Smith (01) E215".to_string(),
                    }],
                }],
            }],
        }
    }

    #[test]
    fn test_serialize_subject_canonical_shape() {
        let value = serialize_subject(&infs3208()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "INFS3208",
                "classes": [{
                    "name": "L",
                    "streams": [{
                        "classes": [{
                            "day": 4,
                            "startTime": { "hours": 12, "minutes": 0 },
                            "endTime": { "hours": 14, "minutes": 0 },
                            "location": "Forgan Smith (01) E215"
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_serialize_subject_is_idempotent() {
        let subject = Generator::builtin().generate_subject(&mut StdRng::seed_from_u64(8));
        let before = subject.clone();

        let first = serialize_subject(&subject).unwrap();
        let second = serialize_subject(&subject).unwrap();

        assert_eq!(first, second);
        assert_eq!(subject, before);
    }

    #[test]
    fn test_serialize_semester_scenario() {
        let weeks = BTreeMap::from([(1, NaiveDate::from_ymd_opt(2021, 7, 19).unwrap())]);
        let semester = Semester::new(2021, 2, true, weeks);

        let value = serialize_semester(&semester).unwrap();
        assert_eq!(
            value,
            json!({ "year": 2021, "semester": 2, "active": true, "weeks": { "1": "2021-07-19" } })
        );
        assert_eq!(parse_semester(value).unwrap(), semester);
    }

    #[test]
    fn test_missing_names_are_rejected() {
        let mut subject = infs3208();
        subject.name.clear();
        assert!(matches!(
            serialize_subject(&subject),
            Err(Error::Serialization { .. })
        ));

        let mut subject = infs3208();
        subject.classes[0].name.clear();
        let err = serialize_subject(&subject).unwrap_err();
        assert!(err.to_string().contains("class 0 of subject INFS3208"));
    }

    #[test]
    fn test_offering_includes_term() {
        let offering = SubjectOffering::new(infs3208(), 2021, 2);
        let value = serialize_offering(&offering).unwrap();
        assert_eq!(value["year"], 2021);
        assert_eq!(value["semester"], 2);
        assert_eq!(value["classes"][0]["name"], "L");

        assert_eq!(parse_offering(value).unwrap(), offering);
    }

    #[test]
    fn test_parse_subject_reads_generated_output() {
        let subject = Generator::builtin().generate_subject(&mut StdRng::seed_from_u64(19));
        let value = serialize_subject(&subject).unwrap();
        assert_eq!(parse_subject(value).unwrap(), subject);
    }

    #[test]
    fn test_parse_rejects_malformed_sessions() {
        let mut value = serialize_subject(&infs3208()).unwrap();
        value["classes"][0]["streams"][0]["classes"][0]["endTime"] = json!({ "hours": 11, "minutes": 0 });
        assert!(parse_subject(value).is_err());

        let mut value = serialize_subject(&infs3208()).unwrap();
        value["classes"][0]["streams"][0]["classes"][0]["day"] = json!(6);
        assert!(parse_subject(value).is_err());

        let value = json!({ "name": "INFS3208" });
        assert!(matches!(parse_subject(value), Err(Error::Serialization { .. })));
    }

    #[test]
    fn test_parse_accepts_very_large_hours() {
        let mut value = serialize_offering(&SubjectOffering::new(infs3208(), 2021, 2)).unwrap();
        let session = &mut value["classes"][0]["streams"][0]["classes"][0];
        session["startTime"] = json!({ "hours": 100_000_000, "minutes": 0 });
        session["endTime"] = json!({ "hours": 100_000_001, "minutes": 0 });

        let offering = parse_offering(value.clone()).unwrap();
        assert_eq!(offering.classes[0].streams[0].sessions[0].length_minutes(), 60);

        // Inverted at the same magnitude is still caught
        value["classes"][0]["streams"][0]["classes"][0]["endTime"] = json!({ "hours": 99_999_999, "minutes": 0 });
        assert!(matches!(parse_offering(value), Err(Error::Serialization { .. })));
    }

    #[test]
    fn test_parse_rejects_one_off_with_weeks() {
        let mut value = serialize_subject(&infs3208()).unwrap();
        let session = &mut value["classes"][0]["streams"][0]["classes"][0];
        session["day"] = json!("2021-11-08");
        session["weeks"] = json!([1, 2]);
        assert!(matches!(parse_subject(value), Err(Error::Serialization { .. })));
    }

    #[test]
    fn test_one_off_session_round_trips_as_date() {
        let mut subject = infs3208();
        subject.classes[0].streams[0].sessions[0].occurrence = Occurrence::OneOff {
            date: NaiveDate::from_ymd_opt(2021, 11, 8).unwrap(),
        };

        let value = serialize_subject(&subject).unwrap();
        assert_eq!(
            value["classes"][0]["streams"][0]["classes"][0]["day"],
            "2021-11-08"
        );
        assert_eq!(parse_subject(value).unwrap(), subject);
    }
}
