//! Version 1 of the story service API.
//!
//! Functions are thin wrappers that validate input, run the generator against
//! a pooled connection, record the outcome in the event log, and return
//! JSON-friendly payloads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::{Result, StoryForgeError};
use crate::logging::{log_event, StoryEvent};
use crate::story::store::{self, SqliteStoryStore};
use crate::story::{StoryGenerator, StoryNodeRecord, StoryRecord};

const MODULE: &str = "story.generator";

/// Shared state handed to every service call.
#[derive(Clone)]
pub struct ApiState {
    pub db: DbPool,
    pub generator: Arc<StoryGenerator>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStoryInput {
    pub theme: String,
    pub session_id: Option<String>,
}

/// A story with its full node graph.
#[derive(Debug, Serialize)]
pub struct StoryView {
    #[serde(flatten)]
    pub story: StoryRecord,
    pub root_node_id: Option<i64>,
    pub nodes: Vec<StoryNodeRecord>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub explain: &'static str,
}

impl From<StoryForgeError> for ApiError {
    fn from(err: StoryForgeError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            explain: err.explain(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Generate a story for the session and return the persisted graph.
pub async fn create_story(
    state: &ApiState,
    input: CreateStoryInput,
) -> std::result::Result<StoryView, ApiError> {
    let theme = input.theme.trim().to_string();
    if theme.is_empty() {
        return Err(StoryForgeError::InvalidInput("theme must not be empty".into()).into());
    }
    let session_id = input
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // No connection or transaction is held while the model call is in flight.
    let generated = state.generator.request_story(&theme).await;

    let mut conn = state.db.get().map_err(StoryForgeError::from)?;
    let outcome = generated.and_then(|response| {
        let mut story_store = SqliteStoryStore::begin(&mut conn)?;
        StoryGenerator::persist_story(&mut story_store, &session_id, response)
    });

    match outcome {
        Ok(story) => {
            let view = load_view(&conn, story.id)?;
            log_event(
                &conn,
                StoryEvent::info(MODULE, "STY-0200", "story generated").with_data(
                    serde_json::json!({
                        "story_id": story.id,
                        "session_id": session_id,
                        "theme": theme,
                        "nodes": view.nodes.len(),
                    }),
                ),
            )?;
            Ok(view)
        }
        Err(err) => {
            let event = StoryEvent::failure(MODULE, "story generation failed", &err).with_data(
                serde_json::json!({
                    "session_id": session_id,
                    "theme": theme,
                    "error": err.to_string(),
                }),
            );
            if let Err(log_err) = log_event(&conn, event) {
                log::warn!("could not record failed generation [{}]: {log_err}", err.code());
            }
            Err(err.into())
        }
    }
}

/// Fetch a previously generated story with all of its nodes.
pub fn get_story(state: &ApiState, story_id: i64) -> std::result::Result<StoryView, ApiError> {
    let conn = state.db.get().map_err(StoryForgeError::from)?;
    Ok(load_view(&conn, story_id)?)
}

/// Stories generated for a session, newest first.
pub fn list_stories(
    state: &ApiState,
    session_id: &str,
) -> std::result::Result<Vec<StoryRecord>, ApiError> {
    let conn = state.db.get().map_err(StoryForgeError::from)?;
    Ok(store::list_stories(&conn, session_id)?)
}

fn load_view(conn: &rusqlite::Connection, story_id: i64) -> Result<StoryView> {
    let story = store::load_story(conn, story_id)?;
    let nodes = store::load_story_nodes(conn, story_id)?;
    let root_node_id = nodes.iter().find(|n| n.is_root).map(|n| n.id);
    Ok(StoryView {
        story,
        root_node_id,
        nodes,
    })
}
