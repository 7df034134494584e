//! clubhub: command-line admin client for the club site.
//!
//! Reads its configuration from the environment (see `.env`). Uses X-API-Key auth
//! unless CLUBHUB_TOKEN is set.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clubhub_admin::{AdminApp, AssetRemover, AssetUploader, SubmitMode, UploadTask};
use clubhub_cli::{init_tracing, submit_draft, ListArgs};
use clubhub_core::models::EntityKind;
use clubhub_core::{extract_youtube_id, AssetFolder, Config, LocalFile};
use clubhub_storage::ProgressFn;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "clubhub", about = "Club site admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file into an asset folder and print its URL
    Upload {
        /// Asset folder, e.g. articles, board-members, article-documents
        folder: AssetFolder,
        /// Path to the file to upload
        file: PathBuf,
        /// Name used for the storage key (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a stored asset by URL
    DeleteAsset {
        url: String,
    },
    /// List records of an entity
    List {
        entity: EntityKind,
        #[command(flatten)]
        filters: ListArgs,
    },
    /// Get a single record by ID
    Get {
        entity: EntityKind,
        id: String,
    },
    /// Delete a record by ID
    Delete {
        entity: EntityKind,
        id: String,
    },
    /// Create or update a record from a JSON form draft, uploading its files
    Submit {
        entity: EntityKind,
        /// Path to the JSON draft
        draft: PathBuf,
        /// Update this record instead of creating one
        #[arg(long)]
        id: Option<String>,
    },
    /// Known generations of a generation-grouped entity
    Generations {
        #[arg(default_value = "board-members")]
        entity: EntityKind,
    },
    /// Site display settings
    Settings {
        #[command(subcommand)]
        sub: SettingsCommands,
    },
    /// Print the YouTube video ID of a link
    VideoId {
        url: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the generation shown on the public site
    Get,
    /// Change the generation shown on the public site
    Set {
        /// Board generation to show; omit to clear
        generation: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn progress_printer(label: String) -> ProgressFn {
    Arc::new(move |percent| eprintln!("{}: {:>5.1}%", label, percent))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Commands::VideoId { url } = &cli.command {
        let id = extract_youtube_id(url)
            .with_context(|| format!("Not a recognizable YouTube link: {}", url))?;
        return print_json(&serde_json::json!({ "videoId": id }));
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    let app = AdminApp::from_config(&config)
        .await
        .context("Failed to set up the admin client. Set CLUBHUB_API_KEY or CLUBHUB_TOKEN")?;

    match cli.command {
        Commands::Upload { folder, file, name } => {
            let file = LocalFile::read_limited(&file, Some(config.max_upload_size_bytes()))
                .await
                .with_context(|| format!("Could not read {}", file.display()))?;
            let desired_name = name.unwrap_or_else(|| file.file_name().to_string());
            let progress = progress_printer(file.file_name().to_string());
            let url = app
                .assets()
                .upload(UploadTask {
                    file,
                    folder,
                    desired_name,
                    progress,
                })
                .await?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Commands::DeleteAsset { url } => {
            app.assets().delete_asset(&url).await?;
            print_json(&serde_json::json!({ "deleted": url }))?;
        }
        Commands::List { entity, filters } => {
            let response = app.api().list_raw(entity, &filters.to_query()).await?;
            print_json(&response)?;
        }
        Commands::Get { entity, id } => {
            let response = app.api().fetch_raw(entity, &id).await?;
            print_json(&response)?;
        }
        Commands::Delete { entity, id } => {
            app.api().remove(entity, &id).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("{} {} deleted", entity, id)
            }))?;
        }
        Commands::Submit { entity, draft, id } => {
            let text = tokio::fs::read_to_string(&draft)
                .await
                .with_context(|| format!("Could not read {}", draft.display()))?;
            let draft: serde_json::Value =
                serde_json::from_str(&text).context("Draft is not valid JSON")?;
            let mode = id.map(SubmitMode::update).unwrap_or(SubmitMode::Create);
            let orchestrator = app
                .orchestrator()
                .with_progress_sink(progress_printer("upload".to_string()));
            let outcome = submit_draft(&orchestrator, entity, draft, mode).await?;
            print_json(&outcome)?;
        }
        Commands::Generations { entity } => {
            anyhow::ensure!(
                entity.has_generations(),
                "{} are not grouped by generation",
                entity
            );
            let generations = app.generations().refresh(entity).await?;
            print_json(&generations)?;
        }
        Commands::Settings { sub } => match sub {
            SettingsCommands::Get => {
                let visible = app.display().load().await?;
                print_json(&serde_json::json!({ "visibleGeneration": visible }))?;
            }
            SettingsCommands::Set { generation } => {
                if let Some(generation) = generation.as_deref() {
                    let catalog = app.generations();
                    catalog.refresh(EntityKind::BoardMembers).await?;
                    catalog
                        .select(EntityKind::BoardMembers, generation.trim())
                        .await?;
                }
                let visible = app.display().publish(generation).await?;
                print_json(&serde_json::json!({ "visibleGeneration": visible }))?;
            }
        },
        Commands::VideoId { .. } => {}
    }

    Ok(())
}
