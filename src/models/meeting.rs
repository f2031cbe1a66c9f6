use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use uuid::Uuid;

use crate::store::{DB, StoreError, save_db};

// Returns the directory where the meeting DB lives.
// Defaults to a relative "./data/meetings" directory.
pub fn get_db_location() -> String {
    if let Ok(path) = env::var("MEETING_DB_LOCATION") {
        return path;
    }
    let base = env::var("DB_LOCATION").unwrap_or("./data".to_string());
    format!("{}/meetings", base)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub attendees: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct InvalidTimeFormat(pub String);

impl fmt::Display for InvalidTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time '{}', expected HH:MM", self.0)
    }
}

impl std::error::Error for InvalidTimeFormat {}

/// Strict `HH:MM` wall-clock parse.
pub fn parse_meeting_time(text: &str) -> Result<NaiveTime, InvalidTimeFormat> {
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| InvalidTimeFormat(text.to_string()))
}

/// Splits a comma-separated attendee field into an ordered, deduplicated
/// list. Empty entries are dropped.
pub fn split_attendees(raw: &str) -> Vec<String> {
    let mut attendees: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let email = part.trim();
        if email.is_empty() || attendees.iter().any(|a| a == email) {
            continue;
        }
        attendees.push(email.to_string());
    }
    attendees
}

pub fn create_meeting(
    db: &mut DB<Meeting>,
    title: &str,
    date: NaiveDate,
    time: NaiveTime,
    location: &str,
    attendees: &str,
    notes: &str,
) -> Result<Meeting, StoreError> {
    let id = Uuid::new_v4().to_string();
    let meeting = Meeting {
        id: id.clone(),
        title: title.to_string(),
        date,
        time,
        location: location.to_string(),
        attendees: split_attendees(attendees),
        notes: notes.to_string(),
        created_at: Utc::now(),
    };
    db.insert(id, meeting.clone());
    save_db(&get_db_location(), db)?;
    Ok(meeting)
}

/// Meetings with `start <= date <= end`, ordered by `(date, time)`.
pub fn query_by_date_range(db: &DB<Meeting>, start: NaiveDate, end: NaiveDate) -> Vec<Meeting> {
    let mut meetings: Vec<Meeting> = db
        .values()
        .filter(|m| m.date >= start && m.date <= end)
        .cloned()
        .collect();
    meetings.sort_by_key(|m| (m.date, m.time));
    meetings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    #[test]
    fn parse_meeting_time_accepts_hh_mm() {
        let time = parse_meeting_time("14:30").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn parse_meeting_time_rejects_garbage() {
        assert!(parse_meeting_time("half past two").is_err());
        assert!(parse_meeting_time("25:00").is_err());
        assert!(parse_meeting_time("14:30:00").is_err());
    }

    #[test]
    fn split_attendees_trims_dedupes_and_drops_empties() {
        let attendees = split_attendees(" a@x.com , b@x.com,, a@x.com ,c@x.com");
        assert_eq!(attendees, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn split_attendees_of_empty_field_is_empty() {
        assert!(split_attendees("").is_empty());
    }

    #[test]
    fn create_meeting_persists_and_query_orders_by_date_then_time() {
        let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let temp_dir = std::env::temp_dir().join(format!("assistant_test_{}", Uuid::new_v4()));
        unsafe {
            std::env::set_var("MEETING_DB_LOCATION", &temp_dir);
        }

        let mut db: DB<Meeting> = HashMap::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let later = NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        let earlier = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

        create_meeting(&mut db, "review", day, later, "", "", "").unwrap();
        create_meeting(&mut db, "standup", day, earlier, "", "", "").unwrap();
        create_meeting(
            &mut db,
            "offsite",
            day.succ_opt().unwrap(),
            earlier,
            "",
            "",
            "",
        )
        .unwrap();

        let meetings = query_by_date_range(&db, day, day);
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[0].title, "standup");
        assert_eq!(meetings[1].title, "review");

        let week = query_by_date_range(&db, day, day.succ_opt().unwrap());
        assert_eq!(week.len(), 3);
        assert_eq!(week[2].title, "offsite");
    }
}
