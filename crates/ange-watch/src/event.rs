//! Filesystem notifications → "a template was written" events

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Added,
    Changed,
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchEventKind::Added => write!(f, "added"),
            WatchEventKind::Changed => write!(f, "changed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

impl WatchEvent {
    pub fn added(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: WatchEventKind::Added,
        }
    }

    pub fn changed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: WatchEventKind::Changed,
        }
    }
}

/// Map a raw notification to write-finished events
///
/// inotify reports a write as create/modify followed by close, so only the
/// close (or a rename into place) is kept there.
#[cfg(target_os = "linux")]
pub fn classify(event: &Event) -> Vec<WatchEvent> {
    use notify::event::{AccessKind, AccessMode};

    let kind = match event.kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => WatchEventKind::Changed,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => WatchEventKind::Added,
        _ => return Vec::new(),
    };
    events_for(event, kind)
}

/// Map a raw notification to write-finished events
#[cfg(not(target_os = "linux"))]
pub fn classify(event: &Event) -> Vec<WatchEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => WatchEventKind::Added,
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Any)
        | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => WatchEventKind::Changed,
        _ => return Vec::new(),
    };
    events_for(event, kind)
}

fn events_for(event: &Event, kind: WatchEventKind) -> Vec<WatchEvent> {
    event
        .paths
        .iter()
        .map(|path| WatchEvent {
            path: path.clone(),
            kind,
        })
        .collect()
}
