use std::{path::PathBuf, sync::Arc};

use futures::StreamExt;
use regex::Regex;
use tracing::debug;

use crate::{
    matcher::RuleSet,
    scrub::SymbolIndex,
    workspace::{self, FileId},
};

/// Search states. `Found` and `NotFound` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Setup,
    Idle,
    Matching,
    Found,
    NotFound,
}

/// Collaborator snapshot for one query: the current document, the
/// workspace to enumerate, and the rule set in effect for this cycle.
#[derive(Debug, Clone)]
pub struct SearchContext {
    pub current_file: FileId,
    pub current_text: String,
    pub roots: Vec<PathBuf>,
    pub rules: RuleSet,
    pub file_types: String,
    pub exclude_paths: Vec<String>,
    pub max_file_size_bytes: u64,
    pub concurrency: usize,
    pub use_index: bool,
}

/// A resolved definition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jump {
    pub file: FileId,
    pub offset: usize,
    pub in_current_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Jump),
    NotFound,
}

/// Per-query search state machine: index lookup, then every rule against
/// the current file, then every rule against the workspace.
///
/// Created fresh for each query and discarded afterwards; nothing about a
/// search outlives the request that issued it.
pub struct Searcher {
    symbol: String,
    ctx: SearchContext,
    index: Arc<SymbolIndex>,
    phase: SearchPhase,
    tried: Vec<String>,
    tried_current_file: bool,
    warnings: Vec<String>,
}

impl Searcher {
    pub fn new(
        symbol: impl Into<String>,
        ctx: SearchContext,
        index: Arc<SymbolIndex>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            ctx,
            index,
            phase: SearchPhase::Setup,
            tried: Vec::new(),
            tried_current_file: false,
            warnings: Vec::new(),
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// One warning per rule rejected during pre-compilation, for the
    /// caller to surface to the user.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Rules tried in the most recent stage (reset when the search
    /// escalates from the current file to the workspace).
    pub fn tried_rules(&self) -> &[String] {
        &self.tried
    }

    /// Whether the current-file pass has been exhausted.
    pub fn tried_current_file(&self) -> bool {
        self.tried_current_file
    }

    pub async fn search(&mut self) -> SearchOutcome {
        // setup: enumerate candidates and pre-compile every rule for
        // this symbol, recording one warning per invalid rule
        let filter = workspace::compile_file_filter(&self.ctx.file_types);
        let files =
            workspace::enumerate_files(&self.ctx.roots, &filter, &self.ctx.exclude_paths, self.ctx.max_file_size_bytes);
        let rules = self.ctx.rules.compile_query(&self.symbol);
        for rule in &rules {
            if let Err(error) = &rule.outcome {
                self.warnings.push(error.to_string());
            }
        }

        self.phase = SearchPhase::Idle;

        if self.ctx.use_index
            && let Some(jump) = self.index_lookup()
        {
            debug!("[search] index hit for {:?} in {}", self.symbol, jump.file);
            self.phase = SearchPhase::Found;
            return SearchOutcome::Found(jump);
        }

        // every rule runs against the current file before any
        // workspace search begins
        for rule in &rules {
            self.tried.push(rule.template.clone());
            let Ok(regex) = &rule.outcome else {
                continue;
            };
            self.phase = SearchPhase::Matching;
            if let Some(m) = regex.find(&self.ctx.current_text) {
                debug!("[search] rule {:?} matched current file at {}", rule.template, m.start());
                self.phase = SearchPhase::Found;
                return SearchOutcome::Found(Jump {
                    file: self.ctx.current_file.clone(),
                    offset: m.start(),
                    in_current_file: true,
                });
            }
            self.phase = SearchPhase::Idle;
        }

        // current file exhausted: reset the tried set and escalate
        self.tried.clear();
        self.tried_current_file = true;
        for rule in &rules {
            self.tried.push(rule.template.clone());
            let Ok(regex) = &rule.outcome else {
                continue;
            };
            self.phase = SearchPhase::Matching;
            if let Some(jump) = self.workspace_scan(regex, &files).await {
                debug!("[search] rule {:?} matched {} at {}", rule.template, jump.file, jump.offset);
                self.phase = SearchPhase::Found;
                return SearchOutcome::Found(jump);
            }
            self.phase = SearchPhase::Idle;
        }

        self.phase = SearchPhase::NotFound;
        SearchOutcome::NotFound
    }

    /// Consult the scrubbed index for the exact query symbol. An
    /// occurrence in the current file is preferred over index order.
    fn index_lookup(&self) -> Option<Jump> {
        let occurrences = self.index.get(&self.symbol);
        if occurrences.is_empty() {
            return None;
        }

        if let Some(occurrence) = occurrences.iter().find(|o| o.file == self.ctx.current_file) {
            return Some(Jump {
                file: occurrence.file.clone(),
                offset: occurrence.offset,
                in_current_file: true,
            });
        }

        let first = occurrences.first()?;
        Some(Jump {
            file: first.file.clone(),
            offset: first.offset,
            in_current_file: false,
        })
    }

    /// Scan every candidate file with bounded concurrency.
    ///
    /// The first match observed to complete wins and the remaining reads
    /// are dropped; across files this is completion order, not
    /// enumeration order.
    async fn workspace_scan(
        &self,
        regex: &Regex,
        files: &[PathBuf],
    ) -> Option<Jump> {
        let hits = futures::stream::iter(files.iter().cloned())
            .map(|path| async move {
                let bytes = tokio::fs::read(&path).await.ok()?;
                let text = String::from_utf8_lossy(&bytes);
                let m = regex.find(&text)?;
                Some((FileId::from_path(&path), m.start()))
            })
            .buffer_unordered(self.ctx.concurrency.max(1))
            .filter_map(|hit| async move { hit });
        futures::pin_mut!(hits);

        let (file, offset) = hits.next().await?;
        let in_current_file = file == self.ctx.current_file;
        Some(Jump {
            file,
            offset,
            in_current_file,
        })
    }
}
