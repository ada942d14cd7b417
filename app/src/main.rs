use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use storyforge_core::agents::LlmSettings;
use storyforge_core::api::v1::{self, ApiState, CreateStoryInput};
use storyforge_core::db::init_db;
use storyforge_core::story::StoryGenerator;

/// Generate a branching story and print its node graph as JSON.
#[derive(Debug, Parser)]
#[command(name = "storyforge", version)]
struct Cli {
    /// Theme handed to the model, e.g. "pirates".
    #[arg(long)]
    theme: String,

    /// Session the story belongs to; a fresh one is generated when omitted.
    #[arg(long, env = "STORYFORGE_SESSION_ID")]
    session_id: Option<String>,

    /// Directory holding storyforge.db.
    #[arg(long, env = "STORYFORGE_WORKSPACE")]
    workspace: Option<PathBuf>,
}

fn workspace_dir() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("com", "StoryForge", "StoryForge") {
        proj.data_dir().to_path_buf()
    } else {
        std::env::temp_dir().join("StoryForge")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = LlmSettings::from_env().context("model settings")?;
    let generator = StoryGenerator::from_settings(&settings).context("chat client")?;
    let db = init_db(cli.workspace.unwrap_or_else(workspace_dir)).context("database")?;
    let state = ApiState {
        db,
        generator: Arc::new(generator),
    };

    let view = v1::create_story(
        &state,
        CreateStoryInput {
            theme: cli.theme,
            session_id: cli.session_id,
        },
    )
    .await
    .map_err(|err| anyhow!("{err} ({})", err.explain))?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
