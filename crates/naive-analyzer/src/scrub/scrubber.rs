use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use futures::StreamExt;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    matcher::RuleSet,
    progress::ProgressToken,
    scrub::{symbol_index::SymbolIndex, types::Occurrence},
    workspace::FileId,
};

pub const SENTINEL_DIR: &str = ".naive-analyzer";
pub const SENTINEL_FILENAME: &str = "scrub-complete";

/// Scrub cycle states. `Complete` is terminal for the cycle; the next
/// cycle re-enters at `Setup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubPhase {
    Setup,
    Idle,
    Scrubbing,
    Done,
    Complete,
}

/// Inputs for one scrub cycle, snapshotted by the caller so the engine
/// never observes configuration changing mid-cycle.
#[derive(Debug, Clone)]
pub struct ScrubPlan {
    pub files: Vec<PathBuf>,
    pub rules: RuleSet,
    pub concurrency: usize,
    /// Workspace root receiving the completion sentinel, if any.
    pub sentinel_root: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ScrubReport {
    pub files: usize,
    pub rules_tried: usize,
    pub symbols: usize,
    pub warnings: Vec<String>,
}

/// The index builder. One instance lives for the whole server session;
/// every cycle rebuilds the shared [`SymbolIndex`] wholesale.
pub struct Scrubber {
    index: Arc<SymbolIndex>,
    phase: Mutex<ScrubPhase>,
    running: AtomicBool,
    current_units: AtomicUsize,
    maximum_units: AtomicUsize,
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrubber {
    pub fn new() -> Self {
        Self {
            index: Arc::new(SymbolIndex::new()),
            phase: Mutex::new(ScrubPhase::Setup),
            running: AtomicBool::new(false),
            current_units: AtomicUsize::new(0),
            maximum_units: AtomicUsize::new(0),
        }
    }

    pub fn index(&self) -> Arc<SymbolIndex> {
        Arc::clone(&self.index)
    }

    pub fn phase(&self) -> ScrubPhase {
        *self.phase.lock().expect("scrub phase lock")
    }

    /// The index is authoritative only once the cycle has completed.
    pub fn is_complete(&self) -> bool {
        self.phase() == ScrubPhase::Complete
    }

    /// `(current, maximum)` progress units; maximum is
    /// `file_count × rule_count` for the running cycle.
    pub fn progress_units(&self) -> (usize, usize) {
        (self.current_units.load(Ordering::Relaxed), self.maximum_units.load(Ordering::Relaxed))
    }

    /// Run one full scrub cycle.
    ///
    /// Returns `None` when a cycle is already running: concurrent build
    /// requests are dropped, not queued (the in-flight cycle finishes on
    /// its stale-but-in-progress file set).
    pub async fn run_cycle(
        &self,
        plan: ScrubPlan,
        progress: &ProgressToken,
    ) -> Option<ScrubReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("[scrub] cycle already running, dropping request");
            return None;
        }
        let report = self.cycle(plan, progress).await;
        self.running.store(false, Ordering::SeqCst);
        Some(report)
    }

    async fn cycle(
        &self,
        plan: ScrubPlan,
        progress: &ProgressToken,
    ) -> ScrubReport {
        self.set_phase(ScrubPhase::Setup);
        let rules = plan.rules.compile_discovery();
        self.current_units.store(0, Ordering::Relaxed);
        self.maximum_units.store(plan.files.len() * rules.len(), Ordering::Relaxed);

        self.set_phase(ScrubPhase::Idle);
        self.index.clear();
        let mut tried: Vec<String> = Vec::new();
        let mut warnings = Vec::new();

        for (nth, rule) in rules.iter().enumerate() {
            self.set_phase(ScrubPhase::Scrubbing);
            tried.push(rule.template.clone());
            match &rule.outcome {
                Ok(regex) => {
                    self.scan_rule(regex, &plan.files, plan.concurrency, progress, nth + 1, rules.len()).await;
                },
                Err(error) => {
                    warn!("[scrub] {error}");
                    warnings.push(error.to_string());
                    // the skipped rule still owns its share of the
                    // denominator, so the percentage can reach 100
                    self.current_units.fetch_add(plan.files.len(), Ordering::Relaxed);
                    self.report_progress(progress, nth + 1, rules.len()).await;
                },
            }
            self.set_phase(ScrubPhase::Done);
        }

        self.set_phase(ScrubPhase::Complete);
        if let Some(root) = &plan.sentinel_root {
            write_sentinel(root).await;
        }

        let report = ScrubReport {
            files: plan.files.len(),
            rules_tried: tried.len(),
            symbols: self.index.symbol_count(),
            warnings,
        };
        info!(
            "[scrub] complete: {} rules over {} files, {} symbols indexed",
            report.rules_tried, report.files, report.symbols
        );
        report
    }

    /// Apply one discovery pattern to every file.
    ///
    /// Reads fan out with bounded concurrency; the combined future
    /// resolves only when every per-file future has completed, which is
    /// the join barrier that lets the cycle advance past this rule.
    async fn scan_rule(
        &self,
        regex: &Regex,
        files: &[PathBuf],
        concurrency: usize,
        progress: &ProgressToken,
        rule_number: usize,
        rule_total: usize,
    ) {
        futures::stream::iter(files)
            .for_each_concurrent(concurrency.max(1), |path| async move {
                match tokio::fs::read(path).await {
                    Ok(bytes) => {
                        self.scan_text(regex, path, &String::from_utf8_lossy(&bytes));
                    },
                    Err(error) => {
                        // an unreadable file contributes zero matches but
                        // still counts toward completion
                        debug!("[scrub] failed to read {}: {error}", path.display());
                    },
                }
                self.current_units.fetch_add(1, Ordering::Relaxed);
                self.report_progress(progress, rule_number, rule_total).await;
            })
            .await;
    }

    fn scan_text(
        &self,
        regex: &Regex,
        path: &Path,
        text: &str,
    ) {
        let file = FileId::from_path(path);
        for caps in regex.captures_iter(text) {
            let Some(symbol) = caps.name("sym") else {
                continue;
            };
            if symbol.as_str().is_empty() {
                continue;
            }
            let offset = caps.get(0).map(|m| m.start()).unwrap_or_default();
            self.index.insert(
                symbol.as_str().to_owned(),
                Occurrence {
                    file: file.clone(),
                    offset,
                },
            );
        }
    }

    async fn report_progress(
        &self,
        progress: &ProgressToken,
        rule_number: usize,
        rule_total: usize,
    ) {
        let maximum = self.maximum_units.load(Ordering::Relaxed);
        if maximum == 0 {
            return;
        }
        let current = self.current_units.load(Ordering::Relaxed).min(maximum);
        let percentage = (current * 100 / maximum) as u32;
        progress
            .report(Some(format!("Updating scrub data ({percentage}%, rule {rule_number}/{rule_total})")), Some(percentage))
            .await;
    }

    fn set_phase(
        &self,
        phase: ScrubPhase,
    ) {
        *self.phase.lock().expect("scrub phase lock") = phase;
    }
}

/// Persist the completion marker under the workspace root. Diagnostic
/// only; nothing reads it back.
async fn write_sentinel(root: &Path) {
    let dir = root.join(SENTINEL_DIR);
    if let Err(error) = tokio::fs::create_dir_all(&dir).await {
        debug!("[scrub] could not create {}: {error}", dir.display());
        return;
    }
    let path = dir.join(SENTINEL_FILENAME);
    let payload = format!("naive-analyzer {} scrub complete\n", env!("CARGO_PKG_VERSION"));
    if let Err(error) = tokio::fs::write(&path, payload).await {
        debug!("[scrub] could not write {}: {error}", path.display());
    }
}
