#![allow(non_snake_case)]

use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;

use meetingAssistant::cli;
use meetingAssistant::config::AppConfig;
use meetingAssistant::models::{meeting, task};
use meetingAssistant::runtime;
use meetingAssistant::service::calendar_service::GoogleCalendarService;
use meetingAssistant::service::dispatcher::Dispatcher;
use meetingAssistant::service::openai_service::OpenAIService;
use meetingAssistant::store::load_db;

const DEFAULT_RUN_MODE: &str = "cli";

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let meeting_db = load_db(&meeting::get_db_location()).expect("Unable to load meeting database.");
    let shared_meeting_db = Arc::new(Mutex::new(meeting_db));
    let task_db = load_db(&task::get_db_location()).expect("Unable to load task database.");
    let shared_task_db = Arc::new(Mutex::new(task_db));

    let openai_api_key = config
        .get("OPENAI_API_KEY")
        .expect("OPENAI_API_KEY environment variable not set");
    let calendar_token = config
        .get("GOOGLE_CALENDAR_TOKEN")
        .expect("GOOGLE_CALENDAR_TOKEN environment variable not set");
    let tz = config.timezone().expect("Invalid timezone configuration");
    let event_duration = config
        .event_duration()
        .expect("Invalid event duration configuration");
    let slots = config
        .slot_config()
        .expect("Invalid work window configuration");

    let calendar = Arc::new(GoogleCalendarService::new(calendar_token, tz, event_duration));
    let responder = Arc::new(OpenAIService::new(openai_api_key));
    let dispatcher = Arc::new(Dispatcher::new(
        shared_meeting_db,
        calendar,
        responder,
        slots,
        tz,
    ));

    let run_mode = config.get("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    if run_mode == "api" {
        let port = config.port().expect("Invalid PORT configuration");
        runtime::run_api(dispatcher, port).await;
    } else if run_mode == "cli" {
        cli::cli(dispatcher, shared_task_db).await;
    } else {
        println!("Invalid run mode {}", run_mode);
    }
}
