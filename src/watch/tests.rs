use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossbeam::channel;

use super::debouncer::{ChangeKind, Debouncer};
use super::pump;

const WINDOW: Duration = Duration::from_millis(300);

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn path(name: &str) -> PathBuf {
    PathBuf::from("/multigat-watch").join(name)
}

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new(WINDOW);
    assert!(!debouncer.is_ready(Instant::now()));
    assert_eq!(debouncer.sleep_duration(Instant::now()), None);
}

#[test]
fn test_leading_edge_fires_immediately() {
    let mut debouncer = Debouncer::new(WINDOW);
    let t0 = Instant::now();

    debouncer.record(path("a.js"), ChangeKind::Modified);
    let fired = debouncer.take_if_ready(t0).unwrap();
    assert_eq!(fired, vec![(path("a.js"), ChangeKind::Modified)]);
}

#[test]
fn test_repeats_within_window_are_held_then_coalesced() {
    let mut debouncer = Debouncer::new(WINDOW);
    let t0 = Instant::now();

    debouncer.record(path("a.js"), ChangeKind::Modified);
    assert!(debouncer.take_if_ready(t0).is_some());

    debouncer.record(path("a.js"), ChangeKind::Modified);
    debouncer.record(path("b.js"), ChangeKind::Created);
    debouncer.record(path("a.js"), ChangeKind::Modified);
    let t1 = t0 + Duration::from_millis(100);
    assert!(debouncer.take_if_ready(t1).is_none());
    assert_eq!(debouncer.sleep_duration(t1), Some(Duration::from_millis(200)));

    let fired = debouncer.take_if_ready(t0 + WINDOW).unwrap();
    assert_eq!(
        fired,
        vec![
            (path("a.js"), ChangeKind::Modified),
            (path("b.js"), ChangeKind::Created)
        ]
    );
    assert!(!debouncer.is_ready(t0 + WINDOW * 2));
}

#[test]
fn test_quiet_period_restores_leading_edge() {
    let mut debouncer = Debouncer::new(WINDOW);
    let t0 = Instant::now();

    debouncer.record(path("a.js"), ChangeKind::Modified);
    debouncer.take_if_ready(t0).unwrap();

    let later = t0 + Duration::from_secs(5);
    debouncer.record(path("a.js"), ChangeKind::Modified);
    assert!(debouncer.take_if_ready(later).is_some());
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new(WINDOW);

    debouncer.add_event(&make_event(vec!["/multigat-watch/a.js"], create_kind()));
    debouncer.add_event(&make_event(vec!["/multigat-watch/b.js"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/multigat-watch/c.js"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(debouncer.changes[&path("a.js")], ChangeKind::Created);
    assert_eq!(debouncer.changes[&path("b.js")], ChangeKind::Modified);
    assert_eq!(debouncer.changes[&path("c.js")], ChangeKind::Removed);
}

#[test]
fn test_state_transitions() {
    let mut debouncer = Debouncer::new(WINDOW);

    debouncer.record(path("restored.js"), ChangeKind::Removed);
    debouncer.record(path("restored.js"), ChangeKind::Created);
    debouncer.record(path("deleted.js"), ChangeKind::Modified);
    debouncer.record(path("deleted.js"), ChangeKind::Removed);
    debouncer.record(path("flash.js"), ChangeKind::Created);
    debouncer.record(path("flash.js"), ChangeKind::Removed);

    assert_eq!(debouncer.changes[&path("restored.js")], ChangeKind::Created);
    assert_eq!(debouncer.changes[&path("deleted.js")], ChangeKind::Removed);
    assert!(!debouncer.changes.contains_key(&path("flash.js")));
}

#[test]
fn test_ignored_events() {
    let mut debouncer = Debouncer::new(WINDOW);

    let metadata = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ));
    debouncer.add_event(&make_event(vec!["/multigat-watch/a.js"], metadata));
    debouncer.add_event(&make_event(
        vec![
            "/multigat-watch/.a.js.swp",
            "/multigat-watch/a.js~",
            "/multigat-watch/.hidden",
        ],
        modify_kind(),
    ));
    debouncer.add_event(&make_event(
        vec!["/multigat-watch/a.js"],
        notify::EventKind::Access(notify::event::AccessKind::Any),
    ));

    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_pump_fires_once_per_burst() {
    let (tx, rx) = channel::unbounded();
    for _ in 0..5 {
        tx.send(Ok(make_event(vec!["/multigat-watch/a.js"], modify_kind())))
            .unwrap();
    }
    drop(tx);

    let mut debouncer = Debouncer::new(WINDOW);
    let mut calls = Vec::new();
    pump(&rx, &mut debouncer, || false, |changes| calls.push(changes.to_vec()));

    assert_eq!(calls, vec![vec![(path("a.js"), ChangeKind::Modified)]]);
}

#[test]
fn test_changes_during_remake_are_coalesced() {
    let (tx, rx) = channel::unbounded();
    tx.send(Ok(make_event(vec!["/multigat-watch/a.js"], modify_kind())))
        .unwrap();

    let mut debouncer = Debouncer::new(Duration::from_millis(50));
    let calls = RefCell::new(Vec::new());
    let fired = Cell::new(0);

    pump(
        &rx,
        &mut debouncer,
        || fired.get() >= 2,
        |changes| {
            fired.set(fired.get() + 1);
            calls.borrow_mut().push(changes.len());
            if fired.get() == 1 {
                // edits landing while the first re-make runs
                for name in ["/multigat-watch/b.js", "/multigat-watch/c.js", "/multigat-watch/b.js"] {
                    tx.send(Ok(make_event(vec![name], modify_kind()))).unwrap();
                }
            }
        },
    );

    assert_eq!(calls.into_inner(), vec![1, 2]);
}
