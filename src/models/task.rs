use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

use crate::store::{DB, StoreError, save_db};

// Returns the directory where the task DB lives.
// Defaults to a relative "./data/tasks" directory.
pub fn get_db_location() -> String {
    if let Ok(path) = env::var("TASK_DB_LOCATION") {
        return path;
    }
    let base = env::var("DB_LOCATION").unwrap_or("./data".to_string());
    format!("{}/tasks", base)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

pub fn create_task(
    db: &mut DB<Task>,
    description: &str,
    due_date: Option<NaiveDate>,
) -> Result<Task, StoreError> {
    let id = Uuid::new_v4().to_string();
    let task = Task {
        id: id.clone(),
        description: description.to_string(),
        due_date,
        completed: false,
        created_at: Utc::now(),
    };
    db.insert(id, task.clone());
    save_db(&get_db_location(), db)?;
    Ok(task)
}

pub fn list_all(db: &DB<Task>) -> Vec<Task> {
    let mut tasks: Vec<Task> = db.values().cloned().collect();
    tasks.sort_by_key(|t| t.created_at);
    tasks
}

pub fn query_by_completion(db: &DB<Task>, completed: bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = db
        .values()
        .filter(|t| t.completed == completed)
        .cloned()
        .collect();
    tasks.sort_by_key(|t| t.created_at);
    tasks
}

/// The only operation allowed to flip `completed`. Returns false when the
/// id is unknown.
pub fn complete_task(db: &mut DB<Task>, id: &str) -> Result<bool, StoreError> {
    match db.get_mut(id) {
        Some(task) => {
            task.completed = true;
            save_db(&get_db_location(), db)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn isolated_db_location() -> std::sync::MutexGuard<'static, ()> {
        let guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
        let temp_dir = std::env::temp_dir().join(format!("assistant_task_test_{}", Uuid::new_v4()));
        unsafe {
            std::env::set_var("TASK_DB_LOCATION", &temp_dir);
        }
        guard
    }

    #[test]
    fn create_task_defaults_to_incomplete() {
        let _guard = isolated_db_location();
        let mut db: DB<Task> = HashMap::new();
        let task = create_task(&mut db, "file expense report", None).unwrap();
        assert!(!task.completed);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn query_by_completion_filters_and_orders() {
        let _guard = isolated_db_location();
        let mut db: DB<Task> = HashMap::new();
        let first = create_task(&mut db, "draft agenda", None).unwrap();
        let second = create_task(&mut db, "book travel", None).unwrap();
        complete_task(&mut db, &second.id).unwrap();

        let pending = query_by_completion(&db, false);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, first.id);

        let done = query_by_completion(&db, true);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, second.id);

        assert_eq!(list_all(&db).len(), 2);
    }

    #[test]
    fn complete_task_reports_unknown_ids() {
        let _guard = isolated_db_location();
        let mut db: DB<Task> = HashMap::new();
        assert!(!complete_task(&mut db, "missing").unwrap());
    }
}
