use serde::{Deserialize, Serialize};

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Wire types for the Google Calendar v3 events resource. Only the fields
/// this assistant reads and writes.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct EventAttendee {
    pub email: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<EventAttendee>,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<ListedEvent>,
}

/// Listed events carry either a concrete `dateTime` or, for all-day
/// events, only a `date`. All-day events have no `dateTime` and are
/// skipped by the sync adapter.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListedTime {
    #[serde(default)]
    pub date_time: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ListedEvent {
    #[serde(default)]
    pub start: Option<ListedTime>,
    #[serde(default)]
    pub end: Option<ListedTime>,
}

pub async fn insert_event(
    api_token: &str,
    event: &CalendarEvent,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let response = client
        .post(EVENTS_URL)
        .bearer_auth(api_token)
        .json(event)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        eprintln!("Calendar insert error {}: {}", status, text);
        return Err(format!("Event insert failed with status {}", status).into());
    }

    let inserted: InsertedEvent = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse event insert response: {}", e))?;
    Ok(inserted.id)
}

/// Lists single events between `time_min` and `time_max` (RFC 3339, local
/// offset included), ordered by start time. Recurring events come back
/// expanded to concrete occurrences.
pub async fn list_events(
    api_token: &str,
    time_min: &str,
    time_max: &str,
) -> Result<Vec<ListedEvent>, Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();
    let response = client
        .get(EVENTS_URL)
        .bearer_auth(api_token)
        .query(&[
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        eprintln!("Calendar list error {}: {}", status, text);
        return Err(format!("Event list failed with status {}", status).into());
    }

    let list: EventList = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse event list response: {}", e))?;
    Ok(list.items)
}
