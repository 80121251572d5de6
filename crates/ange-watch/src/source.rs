//! notify adapter feeding a [`WatchEvent`] channel

use crate::event::{WatchEvent, classify};
use ange_core::{AngeError, MatchPattern, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Live filesystem subscription; notifications stop when dropped
pub struct EventSource {
    _watcher: RecommendedWatcher,
}

impl EventSource {
    /// Watch the root of `pattern`, recursively when matches can be nested
    pub fn subscribe(pattern: &MatchPattern) -> Result<(Self, mpsc::UnboundedReceiver<WatchEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    for watch_event in classify(&event) {
                        // Receiver gone means the orchestrator is shutting down
                        let _ = tx.send(watch_event);
                    }
                }
                Err(e) => tracing::error!("File watching error: {}", e),
            },
            notify::Config::default(),
        )
        .map_err(|e| AngeError::Watch(e.to_string()))?;

        let mode = if pattern.is_recursive() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(pattern.root(), mode)
            .map_err(|e| AngeError::Watch(format!("{}: {}", pattern.root().display(), e)))?;

        tracing::debug!("Subscribed to {} ({:?})", pattern.root().display(), mode);
        Ok((Self { _watcher: watcher }, rx))
    }
}
