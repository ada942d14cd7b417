use std::sync::Arc;

use super::materializer::materialize;
use super::parser::{JsonStoryParser, ResponseParser};
use super::prompt::build_messages;
use super::records::StoryRecord;
use super::store::StoryStore;
use super::tree::StoryLlmResponse;
use crate::agents::{ChatModel, LlmSettings, OpenAiChatClient};
use crate::errors::{Result, StoryForgeError};

/// Coordinates one story generation: model call, parse, persist, commit.
pub struct StoryGenerator {
    model: Arc<dyn ChatModel>,
    parser: Arc<dyn ResponseParser>,
}

impl StoryGenerator {
    pub fn new(model: Arc<dyn ChatModel>, parser: Arc<dyn ResponseParser>) -> Self {
        Self { model, parser }
    }

    /// Default wiring: OpenAI-compatible client plus the JSON parser.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let client = OpenAiChatClient::new(settings)?;
        Ok(Self::new(Arc::new(client), Arc::new(JsonStoryParser)))
    }

    /// Ask the model for a story about `theme` and parse its answer.
    pub async fn request_story(&self, theme: &str) -> Result<StoryLlmResponse> {
        let messages = build_messages(theme, &self.parser.format_instructions());
        let response = self.model.invoke(&messages).await?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "story completion used {:?} tokens on {}",
                usage.total_tokens,
                response.model
            );
        }
        self.parser.parse(&response.content)
    }

    /// Write the story row and its node graph, then commit.
    pub fn persist_story<S>(
        store: &mut S,
        session_id: &str,
        response: StoryLlmResponse,
    ) -> Result<StoryRecord>
    where
        S: StoryStore + ?Sized,
    {
        let StoryLlmResponse { title, root_node } = response;
        let story = store.insert_story(&title, session_id)?;
        let root_id = materialize(store, story.id, root_node, true)?;
        store.commit()?;
        log::info!(
            "story {} ({:?}) committed for session {session_id} with root node {root_id}",
            story.id,
            story.title
        );
        Ok(story)
    }

    /// Generate and persist a new story. Every call creates a new story,
    /// even for identical input.
    pub async fn generate_story<S>(
        &self,
        store: &mut S,
        session_id: &str,
        theme: &str,
    ) -> Result<StoryRecord>
    where
        S: StoryStore + ?Sized,
    {
        let response = self.request_story(theme).await?;
        Self::persist_story(store, session_id, response)
    }

    /// [`StoryGenerator::generate_story`] for callers without an async runtime.
    /// Returns [`StoryForgeError::NestedRuntime`] when called from a thread
    /// that is already driving a tokio runtime.
    pub fn generate_story_blocking<S>(
        &self,
        store: &mut S,
        session_id: &str,
        theme: &str,
    ) -> Result<StoryRecord>
    where
        S: StoryStore + ?Sized,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(StoryForgeError::NestedRuntime);
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.generate_story(store, session_id, theme))
    }
}
