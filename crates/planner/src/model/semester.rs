/// Semester records and resolution of recurring sessions into calendar dates
use super::types::{Occurrence, Session, Stream};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An academic term. `(year, semester)` is the record's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    year: i32,
    semester: u32,
    pub active: bool,
    /// Week-of-semester index → date the week starts on (a Monday)
    pub weeks: BTreeMap<u32, NaiveDate>,
}

impl Semester {
    pub fn new(year: i32, semester: u32, active: bool, weeks: BTreeMap<u32, NaiveDate>) -> Self {
        Self {
            year,
            semester,
            active,
            weeks,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn semester(&self) -> u32 {
        self.semester
    }

    pub fn key(&self) -> (i32, u32) {
        (self.year, self.semester)
    }

    pub fn week_start(&self, week: u32) -> Option<NaiveDate> {
        self.weeks.get(&week).copied()
    }

    /// Every date `session` meets on this semester.
    ///
    /// Recurring sessions use their own week set, then the stream's, then
    /// every week of the semester. Weeks the semester doesn't know are skipped.
    pub fn session_dates(&self, stream: &Stream, session: &Session) -> Vec<NaiveDate> {
        match &session.occurrence {
            Occurrence::OneOff { date } => vec![*date],
            Occurrence::Recurring { day, weeks } => {
                let offset = Days::new(u64::from(*day));
                let starts: Vec<NaiveDate> = match weeks.as_ref().or(stream.weeks.as_ref()) {
                    Some(set) => set.iter().filter_map(|w| self.week_start(*w)).collect(),
                    None => self.weeks.values().copied().collect(),
                };

                starts
                    .into_iter()
                    .filter_map(|start| start.checked_add_days(offset))
                    .collect()
            }
        }
    }

    /// All meetings of a stream this semester, in chronological order.
    pub fn stream_dates<'a>(&self, stream: &'a Stream) -> Vec<(NaiveDate, &'a Session)> {
        let mut dates: Vec<(NaiveDate, &Session)> = stream
            .sessions
            .iter()
            .flat_map(|session| {
                self.session_dates(stream, session)
                    .into_iter()
                    .map(move |date| (date, session))
            })
            .collect();

        dates.sort_by_key(|(date, session)| (*date, session.start_time));
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeValue;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sem_2021_2() -> Semester {
        let weeks = BTreeMap::from([
            (1, date(2021, 7, 26)),
            (2, date(2021, 8, 2)),
            (3, date(2021, 8, 9)),
        ]);
        Semester::new(2021, 2, true, weeks)
    }

    fn session(occurrence: Occurrence, start: u32) -> Session {
        Session {
            occurrence,
            start_time: TimeValue::at(start),
            end_time: TimeValue::at(start + 1),
            location: "Hawken (50) T103".to_string(),
        }
    }

    #[test]
    fn test_recurring_without_weeks_runs_every_week() {
        let s = session(Occurrence::weekly(2), 10);
        let stream = Stream {
            weeks: None,
            sessions: vec![s.clone()],
        };

        let dates = sem_2021_2().session_dates(&stream, &s);
        assert_eq!(
            dates,
            vec![date(2021, 7, 28), date(2021, 8, 4), date(2021, 8, 11)]
        );
    }

    #[test]
    fn test_session_weeks_override_stream_weeks() {
        let s = session(
            Occurrence::Recurring {
                day: 0,
                weeks: Some(BTreeSet::from([3])),
            },
            9,
        );
        let stream = Stream {
            weeks: Some(BTreeSet::from([1, 2])),
            sessions: vec![s.clone()],
        };

        assert_eq!(sem_2021_2().session_dates(&stream, &s), vec![date(2021, 8, 9)]);
    }

    #[test]
    fn test_stream_weeks_apply_and_unknown_weeks_skip() {
        let s = session(Occurrence::weekly(4), 9);
        let stream = Stream {
            weeks: Some(BTreeSet::from([2, 13])),
            sessions: vec![s.clone()],
        };

        assert_eq!(sem_2021_2().session_dates(&stream, &s), vec![date(2021, 8, 6)]);
    }

    #[test]
    fn test_stream_dates_are_chronological() {
        let late = session(Occurrence::weekly(1), 14);
        let early = session(Occurrence::weekly(1), 8);
        let exam = session(
            Occurrence::OneOff {
                date: date(2021, 7, 26),
            },
            9,
        );
        let stream = Stream {
            weeks: Some(BTreeSet::from([1])),
            sessions: vec![late, early, exam],
        };

        let dates = sem_2021_2().stream_dates(&stream);
        let summary: Vec<(NaiveDate, u32)> = dates
            .iter()
            .map(|(d, s)| (*d, s.start_time.hours()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (date(2021, 7, 26), 9),
                (date(2021, 7, 27), 8),
                (date(2021, 7, 27), 14),
            ]
        );
    }
}
