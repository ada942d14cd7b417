use rusqlite::{params, Connection};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::{Result, StoryForgeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// One row of the `event_log` table.
#[derive(Debug, Clone)]
pub struct StoryEvent<'a> {
    pub level: EventLevel,
    pub code: Option<&'a str>,
    pub module: &'a str,
    pub message: &'a str,
    pub explain: Option<&'a str>,
    pub data: Option<Value>,
}

impl<'a> StoryEvent<'a> {
    pub fn info(module: &'a str, code: &'a str, message: &'a str) -> Self {
        Self {
            level: EventLevel::Info,
            code: Some(code),
            module,
            message,
            explain: None,
            data: None,
        }
    }

    /// Error event carrying the catalogue code and explanation of `err`.
    pub fn failure(module: &'a str, message: &'a str, err: &StoryForgeError) -> Self {
        Self {
            level: EventLevel::Error,
            code: Some(err.code()),
            module,
            message,
            explain: Some(err.explain()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Append a structured diagnostic row to `event_log`.
pub fn log_event(conn: &Connection, event: StoryEvent<'_>) -> Result<()> {
    let id = Uuid::new_v4().to_string();
    let ts = OffsetDateTime::now_utc().unix_timestamp();
    let data = event.data.map(|v| v.to_string());
    conn.execute(
        "INSERT INTO event_log (id, ts, level, code, module, message, explain, data) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            ts,
            event.level.as_str(),
            event.code,
            event.module,
            event.message,
            event.explain,
            data
        ],
    )?;
    Ok(())
}
