use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info, warn};

use crate::{
    progress::ProgressToken,
    search::{Jump, QueryAbort, SearchContext, SearchOutcome, Searcher, word_at_position},
    server::state::{NaiveLanguageServer, show_user_message},
    text_pos::line_selection_range,
    workspace::{self, FileId},
};

const CLIENT_NOTIFICATION_PREFIX: &str = "naive-analyzer:";

const NOT_FOUND_MESSAGE: &str = "No definition found.";

#[tower_lsp::async_trait]
impl LanguageServer for NaiveLanguageServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing naive-analyzer...");

        let initial_settings = crate::config::ServerSettings::from_lsp_payload(params.initialization_options.as_ref());
        *self.settings.write().await = initial_settings;

        if let Some(folders) = params.workspace_folders {
            *self.workspace_roots.write().await = folders;
        } else if let Some(root) = params.root_uri {
            *self.workspace_roots.write().await = vec![WorkspaceFolder {
                uri: root,
                name: "root".to_string(),
            }];
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                definition_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "naive-analyzer".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        info!("naive-analyzer initialized");

        let settings = self.settings_snapshot().await;
        if !settings.indexing.enable {
            info!("Skipping initial scrub because naive-analyzer.indexing.enable=false");
            return;
        }

        // Kick off the initial workspace scrub in the background so the
        // editor gets its response immediately.
        let job = self.scrub_job().await;
        tokio::spawn(job.run());
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }
        info!("configuration updated");
        *self.settings.write().await = merged;
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        let version = params.text_document.version;
        let filename = short_name(&uri);
        info!("Opened {filename} (v{version}, {} bytes)", text.len());

        if self.settings_snapshot().await.logging.level.allows_info() {
            let _ = AssertUnwindSafe(
                self.client.log_message(MessageType::INFO, prefixed_client_message(format!("Opened {filename}"))),
            )
            .catch_unwind()
            .await;
        }

        self.document_store.open(uri, text, version);
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        self.document_store.apply_changes(&uri, params.content_changes, params.text_document.version);
    }

    async fn did_save(
        &self,
        params: DidSaveTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let filename = short_name(&uri);
        debug!("Saved {filename}");

        if let Some(text) = params.text {
            // full text on save keeps the store honest even if a change
            // notification was lost
            self.document_store.update(uri.clone(), text, 0);
        }

        let settings = self.settings_snapshot().await;
        if !settings.indexing.enable || !settings.indexing.rebuild_on_save {
            return;
        }

        let Ok(path) = uri.to_file_path() else {
            return;
        };
        let roots = self.workspace_root_paths().await;
        if roots.is_empty() {
            return;
        }

        let rules_settings =
            crate::config::effective_rules(&settings.rules, roots.first().map(std::path::PathBuf::as_path));
        let filter = workspace::compile_file_filter(&rules_settings.file_types);
        if !workspace::file_matches_filter(&filter, &roots, &path) {
            return;
        }

        // saves during an active build are dropped, not queued; the
        // running cycle finishes on its stale file set
        if !self.scrubber.is_complete() {
            debug!("[scrub] save of {filename} during an active cycle, ignoring");
            return;
        }

        info!("rescrubbing after save of {filename}");
        let job = self.scrub_job().await;
        tokio::spawn(job.run());
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        self.document_store.close(&params.text_document.uri);
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(text) = self.document_store.get_content(&uri) else {
            return Ok(None);
        };

        let Some(symbol) = word_at_position(&text, position) else {
            show_user_message(&self.client, MessageType::INFO, QueryAbort::NoSelection.to_string()).await;
            return Ok(None);
        };

        let roots = self.workspace_root_paths().await;
        if roots.is_empty() {
            show_user_message(&self.client, MessageType::INFO, QueryAbort::NoWorkspace.to_string()).await;
            return Ok(None);
        }

        let settings = self.settings_snapshot().await;
        let rules_settings =
            crate::config::effective_rules(&settings.rules, roots.first().map(std::path::PathBuf::as_path));
        let ctx = SearchContext {
            current_file: FileId::from_url(&uri),
            current_text: text.clone(),
            roots,
            rules: crate::matcher::RuleSet::from_settings(&rules_settings),
            file_types: rules_settings.file_types.clone(),
            exclude_paths: settings.indexing.exclude_paths.clone(),
            max_file_size_bytes: settings.indexing.max_file_size_bytes(),
            concurrency: settings.indexing.concurrency,
            use_index: rules_settings.use_index,
        };

        let progress =
            ProgressToken::begin(&self.client, "Definition", Some(format!("Searching for {symbol}…"))).await;
        let start = std::time::Instant::now();
        let mut searcher = Searcher::new(symbol.clone(), ctx, self.scrubber.index());
        let outcome = searcher.search().await;
        let elapsed = start.elapsed();

        for warning in searcher.warnings() {
            show_user_message(&self.client, MessageType::WARNING, warning.clone()).await;
        }

        match outcome {
            SearchOutcome::Found(jump) => match self.jump_to_location(&text, &jump).await {
                Some(location) => {
                    debug!("goto-def {symbol:?} → {}:{} ({elapsed:?})", jump.file, jump.offset);
                    progress.end(Some(format!("Found {symbol}"))).await;
                    Ok(Some(GotoDefinitionResponse::Scalar(location)))
                },
                None => {
                    warn!("goto-def {symbol:?} resolved to unreadable {}", jump.file);
                    show_user_message(&self.client, MessageType::INFO, NOT_FOUND_MESSAGE.to_string()).await;
                    progress.end(Some("No definition found".to_string())).await;
                    Ok(None)
                },
            },
            SearchOutcome::NotFound => {
                debug!("goto-def {symbol:?} → none ({elapsed:?})");
                show_user_message(&self.client, MessageType::INFO, NOT_FOUND_MESSAGE.to_string()).await;
                progress.end(Some("No definition found".to_string())).await;
                Ok(None)
            },
        }
    }

    async fn shutdown(&self) -> Result<()> {
        info!("naive-analyzer shutting down");
        Ok(())
    }
}

impl NaiveLanguageServer {
    /// Turn a resolved jump into an LSP location selecting the whole
    /// line containing the match, so the editor reveals the definition.
    async fn jump_to_location(
        &self,
        current_text: &str,
        jump: &Jump,
    ) -> Option<Location> {
        let target_uri = jump.file.to_url()?;
        let text = if jump.in_current_file {
            current_text.to_owned()
        } else if let Some(open) = self.document_store.get_content(&target_uri) {
            open
        } else {
            let bytes = tokio::fs::read(std::path::Path::new(jump.file.as_str())).await.ok()?;
            String::from_utf8_lossy(&bytes).into_owned()
        };

        Some(Location {
            uri: target_uri,
            range: line_selection_range(&text, jump.offset),
        })
    }
}

fn short_name(uri: &Url) -> String {
    uri.path_segments().and_then(|mut segments| segments.next_back()).unwrap_or("<unknown>").to_string()
}

fn prefixed_client_message(message: String) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {message}")
}
