//! File watcher driving re-makes in `start`.
//!
//! ```text
//! notify → channel → Debouncer (leading edge) → on_change
//! ```
//!
//! Everything runs on the calling thread. Events that arrive while
//! `on_change` runs wait in the channel and are coalesced into the next
//! firing, so at most one re-make is ever in flight.

mod debouncer;
#[cfg(test)]
mod tests;

pub use debouncer::{ChangeKind, Debouncer};

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

/// Upper bound on one wait, so shutdown is noticed promptly.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct SiteWatcher {
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
    debouncer: Debouncer,
}

impl SiteWatcher {
    /// Start watching `paths` recursively.
    ///
    /// Events buffer from this point on, so changes made while the caller
    /// finishes its initial make are not lost.
    pub fn new(paths: &[PathBuf], debounce: Duration) -> notify::Result<Self> {
        let (tx, events) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        for path in paths {
            if path.exists() {
                watcher.watch(path, RecursiveMode::Recursive)?;
            }
        }

        Ok(Self {
            _watcher: watcher,
            events,
            debouncer: Debouncer::new(debounce),
        })
    }

    /// Run until `should_stop` returns true or the watcher goes away.
    pub fn run<S, F>(&mut self, should_stop: S, on_change: F)
    where
        S: FnMut() -> bool,
        F: FnMut(&[(PathBuf, ChangeKind)]),
    {
        pump(&self.events, &mut self.debouncer, should_stop, on_change);
    }
}

/// Drain `events` into `debouncer` and fire `on_change` when it is ready.
fn pump<S, F>(
    events: &Receiver<notify::Result<notify::Event>>,
    debouncer: &mut Debouncer,
    mut should_stop: S,
    mut on_change: F,
) where
    S: FnMut() -> bool,
    F: FnMut(&[(PathBuf, ChangeKind)]),
{
    while !should_stop() {
        let timeout = debouncer
            .sleep_duration(Instant::now())
            .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));

        match events.recv_timeout(timeout) {
            Ok(event) => {
                accept(debouncer, event);
                // Coalesce everything already queued.
                while let Ok(event) = events.try_recv() {
                    accept(debouncer, event);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(changes) = debouncer.take_if_ready(Instant::now()) {
            on_change(&changes);
        }
    }
}

fn accept(debouncer: &mut Debouncer, event: notify::Result<notify::Event>) {
    match event {
        Ok(event) => debouncer.add_event(&event),
        Err(err) => crate::log!("watch"; "watcher error: {}", err),
    }
}
