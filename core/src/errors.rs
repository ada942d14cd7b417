use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryForgeError {
    #[error("Missing configuration value {0}")] MissingConfig(&'static str),
    #[error("Invalid input: {0}")] InvalidInput(String),
    #[error("Model request failed: {0}")] Model(#[from] reqwest::Error),
    #[error("Model endpoint returned {status}: {body}")] ModelStatus { status: u16, body: String },
    #[error("Model returned no completion text")] EmptyCompletion,
    #[error("Model output could not be parsed: {0}")] Parse(String),
    #[error("Storage failure: {0}")] Storage(#[from] rusqlite::Error),
    #[error("Database unavailable: {0}")] DbUnavailable(#[from] r2d2::Error),
    #[error("Story transaction already finished")] TransactionClosed,
    #[error("Story {0} not found")] StoryNotFound(i64),
    #[error("Option list encoding failed: {0}")] Encoding(#[from] serde_json::Error),
    #[error("I/O failure: {0}")] Io(#[from] std::io::Error),
    #[error("Blocking generation called from inside an async runtime")] NestedRuntime,
}

pub type Result<T> = std::result::Result<T, StoryForgeError>;

impl StoryForgeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingConfig(_) => "CFG-1001",
            Self::InvalidInput(_) => "STY-1002",
            Self::Model(_) => "AI-1001",
            Self::ModelStatus { .. } => "AI-1002",
            Self::EmptyCompletion => "AI-1003",
            Self::Parse(_) => "AI-1101",
            Self::DbUnavailable(_) => "DB-1001",
            Self::Storage(_) => "DB-1002",
            Self::TransactionClosed => "DB-1003",
            Self::StoryNotFound(_) => "STY-1001",
            Self::Encoding(_) => "GEN-1001",
            Self::Io(_) => "GEN-1002",
            Self::NestedRuntime => "GEN-1003",
        }
    }
    pub fn explain(&self) -> &'static str {
        match self {
            Self::MissingConfig(_) => "A required model setting (API key or model id) was not provided.",
            Self::InvalidInput(_) => "The story request was rejected before contacting the model.",
            Self::Model(_) => "The chat completion request could not be delivered or read.",
            Self::ModelStatus { .. } => "The model provider rejected the chat completion request.",
            Self::EmptyCompletion => "The model answered without any story text.",
            Self::Parse(_) => "The model output did not match the expected story tree schema.",
            Self::DbUnavailable(_) => "The application could not access the SQLite database.",
            Self::Storage(_) => "A story write or read failed; the transaction was not committed.",
            Self::TransactionClosed => "The story store was used after its transaction ended.",
            Self::StoryNotFound(_) => "No story exists for the requested ID.",
            Self::Encoding(_) => "A node's option list could not be converted to or from JSON.",
            Self::Io(_) => "The workspace directory or the blocking runtime could not be set up.",
            Self::NestedRuntime => "Use the async generate_story when already running on a tokio runtime.",
        }
    }
}
