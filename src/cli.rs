use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::Text;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::task::{self, Task};
use crate::service::dispatcher::Dispatcher;
use crate::store::DB;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat loop against the dispatcher.
    Chat {},
    /// Create a meeting directly, without the chat parse.
    CreateMeeting {
        title: String,
        date: NaiveDate,
        time: String,
        #[arg(default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        attendees: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List free slots for a date.
    FreeSlots { date: NaiveDate },
    /// Add a task to the local store.
    AddTask {
        description: String,
        #[arg(long)]
        due_date: Option<NaiveDate>,
    },
    /// List tasks; pending by default.
    ListTasks {
        #[arg(long)]
        completed: bool,
    },
    /// Mark a task as completed.
    CompleteTask { id: String },
}

pub async fn cli(dispatcher: Arc<Dispatcher>, task_db: Arc<Mutex<DB<Task>>>) {
    // Fine to panic here
    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {} => chat_loop(&dispatcher).await,
        Commands::CreateMeeting {
            title,
            date,
            time,
            location,
            attendees,
            notes,
        } => {
            let response = dispatcher
                .create_meeting_direct(&title, date, &time, &location, &attendees, &notes)
                .await;
            println!("{}", response);
        }
        Commands::FreeSlots { date } => {
            println!("{}", dispatcher.find_free_slots(date).await);
        }
        Commands::AddTask {
            description,
            due_date,
        } => {
            let mut db = task_db.lock().await;
            match task::create_task(&mut db, &description, due_date) {
                Ok(created) => println!("Task added: {}", created.id),
                Err(e) => println!("Failed to add task: {}", e),
            }
        }
        Commands::ListTasks { completed } => {
            let db = task_db.lock().await;
            let tasks = task::query_by_completion(&db, completed);
            if tasks.is_empty() {
                println!("No tasks found.");
                return;
            }
            for item in tasks {
                let due = item
                    .due_date
                    .map(|d| format!(", due {}", d))
                    .unwrap_or_default();
                println!("{} - {}{}", item.id, item.description, due);
            }
        }
        Commands::CompleteTask { id } => {
            let mut db = task_db.lock().await;
            match task::complete_task(&mut db, &id) {
                Ok(true) => println!("Task {} completed.", id),
                Ok(false) => println!("No task with id {}.", id),
                Err(e) => println!("Failed to complete task: {}", e),
            }
        }
    }
}

async fn chat_loop(dispatcher: &Dispatcher) {
    loop {
        let input = match Text::new("You:").prompt() {
            Ok(text) => text,
            Err(_) => break,
        };
        if input.trim().is_empty() {
            break;
        }
        match dispatcher.handle(&input).await {
            Ok(response) => println!("{}", response),
            Err(e) => println!("Assistant unavailable: {}", e),
        }
    }
}
