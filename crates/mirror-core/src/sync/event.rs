//! Sync events and the sinks that receive them

use chrono::{DateTime, Utc};
use mirror_fs::TreePath;
use serde::Serialize;

/// Kind of action a pass took on a replica entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SyncEventKind {
    /// An orphaned replica entry was removed
    Deleted,
    /// A source file with no replica counterpart was copied
    Copied,
    /// A replica file was overwritten with changed source content
    Updated,
}

impl std::fmt::Display for SyncEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Deleted => "Deleted",
            Self::Copied => "Copied",
            Self::Updated => "Updated",
        };
        f.write_str(label)
    }
}

/// An action that completed during a pass.
///
/// Created when the action finishes and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    kind: SyncEventKind,
    path: TreePath,
    timestamp: DateTime<Utc>,
}

impl SyncEvent {
    pub(crate) fn now(kind: SyncEventKind, path: TreePath) -> Self {
        Self {
            kind,
            path,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> SyncEventKind {
        self.kind
    }

    /// Path of the affected entry, relative to the tree roots.
    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.path)
    }
}

/// Receives each event as soon as its action completes.
pub trait EventSink {
    fn record(&mut self, event: &SyncEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&SyncEvent),
{
    fn record(&mut self, event: &SyncEvent) {
        self(event)
    }
}

/// Logs every event at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &SyncEvent) {
        tracing::info!("{}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_display_names_kind_and_path() {
        let event = SyncEvent::now(SyncEventKind::Copied, TreePath::new("sub/b.txt"));
        assert_eq!(event.to_string(), "Copied: sub/b.txt");
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: &SyncEvent| seen.push(event.kind());
            sink.record(&SyncEvent::now(SyncEventKind::Deleted, TreePath::new("c.txt")));
        }
        assert_eq!(seen, vec![SyncEventKind::Deleted]);
    }

    #[test]
    fn event_serializes_path_as_string() {
        let event = SyncEvent::now(SyncEventKind::Updated, TreePath::new("a\\b.txt"));
        let value = toml::Value::try_from(&event).unwrap();
        assert_eq!(value.get("path").and_then(|v| v.as_str()), Some("a/b.txt"));
        assert_eq!(value.get("kind").and_then(|v| v.as_str()), Some("Updated"));
    }
}
