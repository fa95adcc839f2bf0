use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::utils::path::normalize_path;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Leading-edge debouncer.
///
/// The first change after a quiet period is ready at once. Changes arriving
/// within `window` of the last firing are held back and come out together
/// once the window has passed, so a burst costs at most two re-makes.
///
/// Pure timing and deduplication: callers pass `now`, nothing here sleeps.
pub struct Debouncer {
    window: Duration,
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    last_fire: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            changes: FxHashMap::default(),
            last_fire: None,
        }
    }

    /// Add a notify event, ignoring metadata-only changes and editor
    /// artifacts.
    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.record(normalize_path(path), kind);
        }
    }

    /// Record one change, merging with an earlier one for the same path:
    /// - Removed then Created/Modified: restored, keep the new kind
    /// - Modified then Removed: deleted
    /// - Created then Removed: never existed, drop it
    /// - otherwise the first kind wins
    pub fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        match self.changes.get(&path).copied() {
            None => {
                crate::debug!("watch"; "{}: {}", kind.label(), path.display());
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Removed) if kind != ChangeKind::Removed => {
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Modified) if kind == ChangeKind::Removed => {
                self.changes.insert(path, kind);
            }
            Some(ChangeKind::Created) if kind == ChangeKind::Removed => {
                self.changes.remove(&path);
            }
            Some(_) => {}
        }
    }

    /// Whether pending changes may fire at `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        if self.changes.is_empty() {
            return false;
        }
        match self.last_fire {
            None => true,
            Some(fired) => now.saturating_duration_since(fired) >= self.window,
        }
    }

    /// Take pending changes if they may fire at `now`, sorted by path.
    pub fn take_if_ready(&mut self, now: Instant) -> Option<Vec<(PathBuf, ChangeKind)>> {
        if !self.is_ready(now) {
            return None;
        }
        self.last_fire = Some(now);
        let mut changes: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        changes.sort_by(|a, b| a.0.cmp(&b.0));
        Some(changes)
    }

    /// How long until held-back changes may fire. `None` when nothing is
    /// pending.
    pub fn sleep_duration(&self, now: Instant) -> Option<Duration> {
        if self.changes.is_empty() {
            return None;
        }
        let remaining = self
            .last_fire
            .map(|fired| self.window.saturating_sub(now.saturating_duration_since(fired)))
            .unwrap_or(Duration::ZERO);
        Some(remaining)
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
