//! Helpers shared by the `clubhub` binary.

use anyhow::Context;
use clubhub_admin::forms::{
    ArticleForm, BoardMemberForm, EventForm, HonoreeForm, PodcastForm, ProjectForm, ReelForm,
};
use clubhub_admin::{AdminForm, FormOrchestrator, SubmitMode, SubmitOutcome};
use clubhub_core::models::{EntityKind, ListQuery};
use clubhub_core::ErrorMetadata;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Initialize tracing for the CLI. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Pagination and filters of the `list` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ListArgs {
    #[arg(long, default_value = "1")]
    pub page: u32,
    #[arg(long, default_value = "20")]
    pub limit: u32,
    /// Only records of this generation
    #[arg(long)]
    pub generation: Option<String>,
    /// Comma-separated labels
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Event mode: online, offline or hybrid
    #[arg(long)]
    pub mode: Option<String>,
}

impl ListArgs {
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            generation: self.generation.clone(),
            labels: self.labels.clone(),
            status: self.status.clone(),
            mode: self.mode.clone(),
            ..ListQuery::page(self.page, self.limit)
        }
    }
}

/// Submit a JSON form draft for `kind` and describe the outcome as JSON.
///
/// Asset fields in the draft are either a stored URL or
/// `{"path": "...", "previous": "..."}` for a file to upload.
pub async fn submit_draft(
    orchestrator: &FormOrchestrator,
    kind: EntityKind,
    draft: Value,
    mode: SubmitMode,
) -> anyhow::Result<Value> {
    match kind {
        EntityKind::BoardMembers => submit_as::<BoardMemberForm>(orchestrator, draft, mode).await,
        EntityKind::Articles => submit_as::<ArticleForm>(orchestrator, draft, mode).await,
        EntityKind::Events => submit_as::<EventForm>(orchestrator, draft, mode).await,
        EntityKind::Podcasts => submit_as::<PodcastForm>(orchestrator, draft, mode).await,
        EntityKind::Reels => submit_as::<ReelForm>(orchestrator, draft, mode).await,
        EntityKind::Honorees => submit_as::<HonoreeForm>(orchestrator, draft, mode).await,
        EntityKind::Projects => submit_as::<ProjectForm>(orchestrator, draft, mode).await,
    }
}

async fn submit_as<F>(
    orchestrator: &FormOrchestrator,
    draft: Value,
    mode: SubmitMode,
) -> anyhow::Result<Value>
where
    F: AdminForm + DeserializeOwned,
    F::Record: Serialize,
{
    let form: F = serde_json::from_value(draft)
        .with_context(|| format!("Invalid {} draft", F::KIND))?;
    let outcome = orchestrator
        .submit(&form, mode)
        .await
        .map_err(|e| anyhow::anyhow!("{} [{}]", e.user_message(), e.error_code()))?;
    outcome_json(&outcome)
}

/// JSON summary of a saved submission.
pub fn outcome_json<R: Serialize>(outcome: &SubmitOutcome<R>) -> anyhow::Result<Value> {
    let failures: Vec<Value> = outcome
        .cleanup_failures
        .iter()
        .map(|f| json!({ "url": f.url, "reason": f.reason }))
        .collect();
    Ok(json!({
        "record": serde_json::to_value(&outcome.record).context("Serialize record")?,
        "uploaded": outcome.uploaded,
        "superseded": outcome.superseded,
        "cleanupFailures": failures,
    }))
}
