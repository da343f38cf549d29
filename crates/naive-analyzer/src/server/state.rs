use std::{panic::AssertUnwindSafe, path::PathBuf, sync::Arc};

use futures::FutureExt;
use tokio::sync::RwLock;
use tower_lsp::{
    Client,
    lsp_types::{MessageType, WorkspaceFolder},
};
use tracing::{debug, info};

use crate::{
    config::{ServerSettings, effective_rules},
    document::DocumentStore,
    matcher::RuleSet,
    progress::ProgressToken,
    scrub::{ScrubPlan, Scrubber},
    workspace,
};

/// The naive-analyzer backend that implements the Language Server Protocol.
pub struct NaiveLanguageServer {
    /// The LSP client handle, used for messages, logs and progress.
    pub(crate) client: Client,

    /// Thread-safe store of all open documents.
    pub(crate) document_store: Arc<DocumentStore>,

    /// The index builder, owner of the shared symbol index. Created at
    /// activation and torn down with the server; one instance serves
    /// every query and rebuild.
    pub(crate) scrubber: Arc<Scrubber>,

    /// Workspace root folders, populated during `initialize`.
    pub(crate) workspace_roots: RwLock<Vec<WorkspaceFolder>>,

    /// Runtime server settings updated from LSP configuration.
    pub(crate) settings: Arc<RwLock<ServerSettings>>,
}

impl NaiveLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            document_store: Arc::new(DocumentStore::new()),
            scrubber: Arc::new(Scrubber::new()),
            workspace_roots: RwLock::new(Vec::new()),
            settings: Arc::new(RwLock::new(ServerSettings::default())),
        }
    }

    pub(crate) async fn settings_snapshot(&self) -> ServerSettings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn workspace_root_paths(&self) -> Vec<PathBuf> {
        self.workspace_roots.read().await.iter().filter_map(|folder| folder.uri.to_file_path().ok()).collect()
    }

    /// Detach everything a background scrub needs from the server's
    /// lifetime, so the cycle can run in a spawned task.
    pub(crate) async fn scrub_job(&self) -> ScrubJob {
        ScrubJob {
            client: self.client.clone(),
            scrubber: Arc::clone(&self.scrubber),
            settings: self.settings_snapshot().await,
            roots: self.workspace_root_paths().await,
        }
    }
}

pub(crate) struct ScrubJob {
    pub(crate) client: Client,
    pub(crate) scrubber: Arc<Scrubber>,
    pub(crate) settings: ServerSettings,
    pub(crate) roots: Vec<PathBuf>,
}

impl ScrubJob {
    /// Run one full scrub cycle against the current workspace, with
    /// progress reporting and user-visible rule warnings.
    pub(crate) async fn run(self) {
        if self.roots.is_empty() {
            debug!("[scrub] no workspace folders, skipping");
            return;
        }

        // rule set and filter are re-read at the start of every cycle
        let rules_settings = effective_rules(&self.settings.rules, self.roots.first().map(PathBuf::as_path));
        let rules = RuleSet::from_settings(&rules_settings);
        if rules.is_empty() {
            info!("[scrub] no definition rules configured, nothing to index");
            return;
        }

        let filter = workspace::compile_file_filter(&rules_settings.file_types);
        let files = workspace::enumerate_files(
            &self.roots,
            &filter,
            &self.settings.indexing.exclude_paths,
            self.settings.indexing.max_file_size_bytes(),
        );
        let plan = ScrubPlan {
            files,
            rules,
            concurrency: self.settings.indexing.concurrency,
            sentinel_root: self.roots.first().cloned(),
        };

        let progress =
            ProgressToken::begin(&self.client, "Scrubbing definitions", Some("Updating scrub data".to_string())).await;
        match self.scrubber.run_cycle(plan, &progress).await {
            Some(report) => {
                for warning in &report.warnings {
                    show_user_message(&self.client, MessageType::WARNING, warning.clone()).await;
                }
                progress.end(Some(format!("Indexed {} symbols from {} files", report.symbols, report.files))).await;
            },
            None => {
                progress.end(Some("Scrub already in progress".to_string())).await;
            },
        }
    }
}

/// `window/showMessage` behind a crash guard: a disconnected client must
/// never take the server down.
pub(crate) async fn show_user_message(
    client: &Client,
    typ: MessageType,
    message: String,
) {
    let _ = AssertUnwindSafe(client.show_message(typ, message)).catch_unwind().await;
}
