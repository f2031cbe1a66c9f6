use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use std::fmt;

use crate::clients::calendar_client::{
    self, CalendarEvent, EventAttendee, EventDateTime, ListedEvent,
};
use crate::interval::{TimeRange, local_in_tz};
use crate::models::meeting::Meeting;

/// Remote calendar unreachable, or it rejected the request. The meeting
/// still exists locally when a push fails.
#[derive(Debug)]
pub struct SyncError(pub String);

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "calendar sync failed: {}", self.0)
    }
}

impl std::error::Error for SyncError {}

/// Boundary to the externally owned calendar. The remote side is
/// authoritative for busy intervals; we only push created meetings and
/// pull a day's schedule.
#[async_trait]
pub trait CalendarSync: Send + Sync {
    /// Creates the remote event for a locally saved meeting. Returns the
    /// opaque remote event id.
    async fn push_event(&self, meeting: &Meeting) -> Result<String, SyncError>;

    /// All busy intervals on the given calendar day, recurring events
    /// expanded, ordered by start.
    async fn list_busy_intervals(&self, date: NaiveDate) -> Result<Vec<TimeRange>, SyncError>;
}

pub struct GoogleCalendarService {
    api_token: String,
    tz: Tz,
    event_duration: Duration,
}

impl GoogleCalendarService {
    pub fn new(api_token: String, tz: Tz, event_duration: Duration) -> Self {
        Self {
            api_token,
            tz,
            event_duration,
        }
    }
}

#[async_trait]
impl CalendarSync for GoogleCalendarService {
    async fn push_event(&self, meeting: &Meeting) -> Result<String, SyncError> {
        let event = event_payload(meeting, self.tz, self.event_duration);
        calendar_client::insert_event(&self.api_token, &event)
            .await
            .map_err(|e| SyncError(e.to_string()))
    }

    async fn list_busy_intervals(&self, date: NaiveDate) -> Result<Vec<TimeRange>, SyncError> {
        let day_start = local_in_tz(date.and_hms_opt(0, 0, 0).unwrap(), self.tz);
        let day_end = local_in_tz(date.and_hms_opt(23, 59, 59).unwrap(), self.tz);
        let items = calendar_client::list_events(
            &self.api_token,
            &day_start.to_rfc3339_opts(SecondsFormat::Secs, false),
            &day_end.to_rfc3339_opts(SecondsFormat::Secs, false),
        )
        .await
        .map_err(|e| SyncError(e.to_string()))?;
        busy_intervals_from(&items)
    }
}

/// Builds the remote event body for a meeting. The event spans
/// `[date+time, date+time+duration)` in the configured timezone.
pub fn event_payload(meeting: &Meeting, tz: Tz, duration: Duration) -> CalendarEvent {
    let start = local_in_tz(meeting.date.and_time(meeting.time), tz);
    let end = start + duration;
    CalendarEvent {
        summary: meeting.title.clone(),
        location: meeting.location.clone(),
        description: meeting.notes.clone(),
        start: EventDateTime {
            date_time: start.to_rfc3339_opts(SecondsFormat::Secs, false),
            time_zone: tz.name().to_string(),
        },
        end: EventDateTime {
            date_time: end.to_rfc3339_opts(SecondsFormat::Secs, false),
            time_zone: tz.name().to_string(),
        },
        attendees: meeting
            .attendees
            .iter()
            .map(|email| EventAttendee {
                email: email.clone(),
            })
            .collect(),
    }
}

/// Converts listed events to UTC busy intervals. All-day events carry no
/// concrete datetimes and are skipped; a malformed timestamp is a
/// `SyncError` rather than a silently wrong schedule.
pub fn busy_intervals_from(items: &[ListedEvent]) -> Result<Vec<TimeRange>, SyncError> {
    let mut busy = Vec::with_capacity(items.len());
    for item in items {
        let (start, end) = match (concrete_datetime(&item.start), concrete_datetime(&item.end)) {
            (Some(start), Some(end)) => (start, end),
            _ => continue,
        };
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        busy.push(TimeRange::new(start, end));
    }
    Ok(busy)
}

fn concrete_datetime(time: &Option<crate::clients::calendar_client::ListedTime>) -> Option<&str> {
    time.as_ref().and_then(|t| t.date_time.as_deref())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SyncError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SyncError(format!("bad event timestamp '{}': {}", raw, e)))
}
