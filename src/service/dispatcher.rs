use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::meeting::{self, Meeting, parse_meeting_time};
use crate::service::calendar_service::CalendarSync;
use crate::service::openai_service::OpenAIClient;
use crate::service::routing::{Command, MeetingRequest, parse_command};
use crate::service::slot_service::{SlotConfig, compute_free_slots};
use crate::store::DB;

/// Executes classified commands against the injected store, calendar and
/// fallback responder. Stateless per request; every call reclassifies the
/// text from scratch.
pub struct Dispatcher {
    db: Arc<Mutex<DB<Meeting>>>,
    calendar: Arc<dyn CalendarSync>,
    responder: Arc<dyn OpenAIClient>,
    slots: SlotConfig,
    tz: Tz,
}

impl Dispatcher {
    pub fn new(
        db: Arc<Mutex<DB<Meeting>>>,
        calendar: Arc<dyn CalendarSync>,
        responder: Arc<dyn OpenAIClient>,
        slots: SlotConfig,
        tz: Tz,
    ) -> Self {
        Dispatcher {
            db,
            calendar,
            responder,
            slots,
            tz,
        }
    }

    /// Single entry point for the transport layer. Store and sync failures
    /// are converted to user-facing text here; the only `Err` is the
    /// fallback responder's own failure, passed through unmodified.
    pub async fn handle(
        &self,
        text: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match parse_command(text) {
            Command::CreateMeeting(request) => Ok(self.create_meeting(&request).await),
            Command::ListTodayMeetings => Ok(self.list_today_meetings().await),
            Command::FindFreeSlotsToday => Ok(self.find_free_slots(self.today()).await),
            Command::Fallback => self.responder.generate_prompt(text, "assistant").await,
        }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    async fn create_meeting(&self, request: &MeetingRequest) -> String {
        self.create_meeting_direct(
            &request.title,
            self.today(),
            &request.time,
            &request.location,
            "",
            "",
        )
        .await
    }

    async fn list_today_meetings(&self) -> String {
        let today = self.today();
        let db = self.db.lock().await;
        let meetings = meeting::query_by_date_range(&db, today, today);
        if meetings.is_empty() {
            return "No meetings found in this date range.".to_string();
        }
        let mut result = String::from("Meetings:\n");
        for meeting in &meetings {
            result.push_str(&format!(
                "- {} on {} at {}, location: {}\n",
                meeting.title,
                meeting.date,
                meeting.time.format("%H:%M"),
                meeting.location
            ));
        }
        result
    }

    /// Public so the CLI can ask about dates other than today; the chat
    /// surface always passes today.
    pub async fn find_free_slots(&self, date: NaiveDate) -> String {
        let busy = match self.calendar.list_busy_intervals(date).await {
            Ok(busy) => busy,
            Err(e) => return format!("Error fetching calendar events: {}", e),
        };
        let slots = compute_free_slots(date, &busy, &self.slots, self.tz);
        if slots.is_empty() {
            return "No free slots found on this date.".to_string();
        }
        let formatted: Vec<String> = slots.iter().map(|t| t.format("%H:%M").to_string()).collect();
        format!("Free slots: {}", formatted.join(", "))
    }

    /// Creation path shared by the chat parse and the CLI subcommand.
    /// The store write commits first and never depends on the remote push;
    /// the store lock is released before the network call.
    pub async fn create_meeting_direct(
        &self,
        title: &str,
        date: NaiveDate,
        time_str: &str,
        location: &str,
        attendees: &str,
        notes: &str,
    ) -> String {
        if title.is_empty() {
            return "Error creating meeting: missing meeting title.".to_string();
        }
        let time = match parse_meeting_time(time_str) {
            Ok(time) => time,
            Err(e) => return format!("Error creating meeting: {}", e),
        };

        let saved = {
            let mut db = self.db.lock().await;
            meeting::create_meeting(&mut db, title, date, time, location, attendees, notes)
        };
        let meeting = match saved {
            Ok(meeting) => meeting,
            Err(e) => return format!("Could not save meeting locally: {}", e),
        };

        match self.calendar.push_event(&meeting).await {
            Ok(_) => format!("Meeting '{}' created successfully.", meeting.title),
            Err(e) => format!("Meeting '{}' was saved locally, but {}", meeting.title, e),
        }
    }
}
