//! Single-pass intent classification over fixed substring markers, kept
//! separate from command execution so the matching can evolve without
//! touching the dispatcher.
//!
//! The `CreateMeeting` field extraction is positional on purpose: the whole
//! input is split on `'،'` and fields are read by index, matching the
//! established chat contract. Field 1 is accepted and ignored.

pub const CREATE_MEETING_MARKER: &str = "جلسه جدید";
pub const TODAY_MEETINGS_MARKER: &str = "جلسات امروز";
pub const FREE_SLOTS_MARKER: &str = "زمان آزاد";

pub const FIELD_DELIMITER: char = '،';
pub const DEFAULT_MEETING_TIME: &str = "10:00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub title: String,
    /// Raw `HH:MM` text; validated at execution time, not here.
    pub time: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The meeting date is always "today"; the chat surface never accepts
    /// an explicit date.
    CreateMeeting(MeetingRequest),
    ListTodayMeetings,
    FindFreeSlotsToday,
    /// No marker matched; the raw text goes to the opaque responder.
    Fallback,
}

pub fn parse_command(text: &str) -> Command {
    if text.contains(CREATE_MEETING_MARKER) {
        return Command::CreateMeeting(parse_meeting_request(text));
    }
    if text.contains(TODAY_MEETINGS_MARKER) {
        return Command::ListTodayMeetings;
    }
    if text.contains(FREE_SLOTS_MARKER) {
        return Command::FindFreeSlotsToday;
    }
    Command::Fallback
}

fn parse_meeting_request(text: &str) -> MeetingRequest {
    let parts: Vec<&str> = text.split(FIELD_DELIMITER).collect();
    let title = parts[0].replace(CREATE_MEETING_MARKER, "").trim().to_string();
    let time = parts
        .get(2)
        .map(|p| p.trim().to_string())
        .unwrap_or(DEFAULT_MEETING_TIME.to_string());
    let location = parts
        .get(3)
        .map(|p| p.trim().to_string())
        .unwrap_or_default();
    MeetingRequest {
        title,
        time,
        location,
    }
}
