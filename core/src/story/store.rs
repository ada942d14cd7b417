//! Write-side storage seam used by generation, plus read queries over the
//! persisted story graph.
//!
//! [`StoryStore`] is the only interface the materializer and generator see.
//! [`SqliteStoryStore`] implements it on top of a single rusqlite
//! transaction; dropping it without [`StoryStore::commit`] rolls everything
//! back.

use r2d2_sqlite::rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use time::OffsetDateTime;

use super::records::{NewStoryNode, StoredOption, StoryNodeRecord, StoryRecord};
use crate::errors::{Result, StoryForgeError};

pub trait StoryStore {
    /// Insert the story row and return it with its assigned identity.
    fn insert_story(&mut self, title: &str, session_id: &str) -> Result<StoryRecord>;

    /// Insert a node with an empty option list and return its identity.
    fn insert_node(&mut self, node: &NewStoryNode) -> Result<i64>;

    /// Replace the option list of an already inserted node.
    fn set_node_options(&mut self, node_id: i64, options: &[StoredOption]) -> Result<()>;

    /// Finalize every write made through this store.
    fn commit(&mut self) -> Result<()>;
}

pub struct SqliteStoryStore<'conn> {
    tx: Option<Transaction<'conn>>,
}

impl<'conn> SqliteStoryStore<'conn> {
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        let tx = conn.transaction()?;
        Ok(Self { tx: Some(tx) })
    }

    fn tx(&self) -> Result<&Transaction<'conn>> {
        self.tx.as_ref().ok_or(StoryForgeError::TransactionClosed)
    }
}

impl StoryStore for SqliteStoryStore<'_> {
    fn insert_story(&mut self, title: &str, session_id: &str) -> Result<StoryRecord> {
        let tx = self.tx()?;
        let now = OffsetDateTime::now_utc().unix_timestamp();
        tx.execute(
            "INSERT INTO stories (title, session_id, created_at) VALUES (?1, ?2, ?3)",
            params![title, session_id, now],
        )?;
        Ok(StoryRecord {
            id: tx.last_insert_rowid(),
            title: title.to_string(),
            session_id: session_id.to_string(),
            created_at: now,
        })
    }

    fn insert_node(&mut self, node: &NewStoryNode) -> Result<i64> {
        let tx = self.tx()?;
        tx.execute(
            "INSERT INTO story_nodes (story_id, content, is_root, is_ending, is_winning_ending, options_json)
             VALUES (?1, ?2, ?3, ?4, ?5, '[]')",
            params![
                node.story_id,
                node.content,
                node.is_root,
                node.is_ending,
                node.is_winning_ending,
            ],
        )?;
        Ok(tx.last_insert_rowid())
    }

    fn set_node_options(&mut self, node_id: i64, options: &[StoredOption]) -> Result<()> {
        let tx = self.tx()?;
        let options_json = serde_json::to_string(options)?;
        tx.execute(
            "UPDATE story_nodes SET options_json = ?1 WHERE id = ?2",
            params![options_json, node_id],
        )?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let tx = self.tx.take().ok_or(StoryForgeError::TransactionClosed)?;
        tx.commit()?;
        Ok(())
    }
}

pub fn load_story(conn: &Connection, story_id: i64) -> Result<StoryRecord> {
    conn.query_row(
        "SELECT id, title, session_id, created_at FROM stories WHERE id = ?1",
        params![story_id],
        map_story,
    )
    .optional()?
    .ok_or(StoryForgeError::StoryNotFound(story_id))
}

/// Stories of one session, newest first.
pub fn list_stories(conn: &Connection, session_id: &str) -> Result<Vec<StoryRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, session_id, created_at FROM stories WHERE session_id = ?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![session_id], map_story)?;
    let mut stories = Vec::new();
    for row in rows {
        stories.push(row?);
    }
    Ok(stories)
}

/// Every node of a story in insertion (pre-order) sequence.
pub fn load_story_nodes(conn: &Connection, story_id: i64) -> Result<Vec<StoryNodeRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, story_id, content, is_root, is_ending, is_winning_ending, options_json
         FROM story_nodes WHERE story_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![story_id], |row| {
        Ok((
            StoryNodeRecord {
                id: row.get(0)?,
                story_id: row.get(1)?,
                content: row.get(2)?,
                is_root: row.get(3)?,
                is_ending: row.get(4)?,
                is_winning_ending: row.get(5)?,
                options: Vec::new(),
            },
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut nodes = Vec::new();
    for row in rows {
        let (mut node, options_json) = row?;
        node.options = serde_json::from_str(&options_json)?;
        nodes.push(node);
    }
    Ok(nodes)
}

fn map_story(row: &Row) -> rusqlite::Result<StoryRecord> {
    Ok(StoryRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        session_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}
