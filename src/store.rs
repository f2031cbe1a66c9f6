use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Keyed record store held in memory and persisted as a single JSON file
/// under a location directory.
pub type DB<T> = HashMap<String, T>;

const DB_FILE: &str = "db.json";

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O error: {}", e),
            StoreError::Serialization(e) => write!(f, "store serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

/// Loads the store at `location`. A missing file is an empty store, not an
/// error, so first runs work without setup.
pub fn load_db<T: DeserializeOwned>(location: &str) -> Result<DB<T>, StoreError> {
    let path = Path::new(location).join(DB_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(&path)?;
    let db = serde_json::from_str(&content)?;
    Ok(db)
}

/// Writes the whole store back to disk. Creates the location directory on
/// first save.
pub fn save_db<T: Serialize>(location: &str, db: &DB<T>) -> Result<(), StoreError> {
    fs::create_dir_all(location)?;
    let path = Path::new(location).join(DB_FILE);
    let content = serde_json::to_string_pretty(db)?;
    fs::write(&path, content)?;
    Ok(())
}
