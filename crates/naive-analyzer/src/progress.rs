//! Work-done progress reporting via the LSP `$/progress` notification.
//!
//! Replaces the status-bar percentage display of the original editor
//! extension: the server creates a progress token, sends `Begin` /
//! `Report` / `End`, and the editor renders them in its activity
//! indicator.

use std::{
    panic::AssertUnwindSafe,
    sync::atomic::{AtomicU64, Ordering},
};

use futures::FutureExt;
use tower_lsp::{Client, lsp_types::*};
use tracing::{debug, warn};

static NEXT_PROGRESS_ID: AtomicU64 = AtomicU64::new(1);
const PROGRESS_TITLE_PREFIX: &str = "naive-analyzer:";

/// A handle to an active work-done progress session.
///
/// If dropped without calling [`end`](Self::end), the `Drop` impl sends a
/// fire-and-forget `End` notification so the editor never shows a stuck
/// indicator. [`disabled`](Self::disabled) builds a no-op token for
/// engine code exercised without a client (tests, benches).
pub struct ProgressToken {
    client: Option<Client>,
    token: Option<NumberOrString>,
}

impl ProgressToken {
    /// Start a new progress session: `window/workDoneProgress/create`
    /// followed by a `$/progress` `Begin` notification.
    ///
    /// The create request runs as a background task; editors that do not
    /// support it still tolerate the bare notifications.
    pub async fn begin(
        client: &Client,
        title: &str,
        message: Option<String>,
    ) -> Self {
        let id = NEXT_PROGRESS_ID.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("naiveAnalyzer/{title}/{id}"));
        let display_title = format!("{PROGRESS_TITLE_PREFIX} {}", title.trim());

        let create_client = client.clone();
        let create_token = token.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(create_client.send_request::<request::WorkDoneProgressCreate>(
                WorkDoneProgressCreateParams {
                    token: create_token,
                },
            ))
            .catch_unwind()
            .await;
            match result {
                Ok(Ok(())) => {},
                Ok(Err(error)) => {
                    debug!("workDoneProgress/create failed (editor may not support it): {error}");
                },
                Err(_) => {
                    warn!("workDoneProgress/create panicked (client may have disconnected)");
                },
            }
        });

        let sent = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
            token: token.clone(),
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: display_title,
                cancellable: Some(false),
                message,
                percentage: None,
            })),
        }))
        .catch_unwind()
        .await;

        if sent.is_err() {
            warn!("progress begin notification panicked (client may have disconnected)");
            return Self::disabled();
        }

        Self {
            client: Some(client.clone()),
            token: Some(token),
        }
    }

    /// A token that swallows every update. Engine code can report
    /// progress unconditionally and tests stay client-free.
    pub fn disabled() -> Self {
        Self {
            client: None,
            token: None,
        }
    }

    /// Send an intermediate update. `percentage` is clamped to `0..=100`.
    pub async fn report(
        &self,
        message: Option<String>,
        percentage: Option<u32>,
    ) {
        let Some(client) = &self.client else {
            return;
        };
        let Some(token) = &self.token else {
            return;
        };

        let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
            token: token.clone(),
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::Report(WorkDoneProgressReport {
                cancellable: Some(false),
                message,
                percentage: percentage.map(|p| p.min(100)),
            })),
        }))
        .catch_unwind()
        .await;
    }

    /// Finish the session. Consumes `self` so no further updates can be
    /// sent.
    pub async fn end(
        mut self,
        message: Option<String>,
    ) {
        let (Some(client), Some(token)) = (self.client.take(), self.token.take()) else {
            return;
        };

        debug!("progress end: {token:?}");

        let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                message,
            })),
        }))
        .catch_unwind()
        .await;
    }
}

impl Drop for ProgressToken {
    fn drop(&mut self) {
        if let (Some(client), Some(token)) = (self.client.take(), self.token.take()) {
            debug!("progress cancelled (drop): {token:?}");
            tokio::spawn(async move {
                let _ = AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
                    token,
                    value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                        message: Some("Cancelled".to_string()),
                    })),
                }))
                .catch_unwind()
                .await;
            });
        }
    }
}
