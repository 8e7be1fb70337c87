//! Observer registry tests
//!
//! Registration order, named dispatch, error propagation and removal by
//! handle identity.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{build_layout, new_log, observe, three_columns, FakeSurface, Recorder};
use table_layout::{Callbacks, LayoutError, LayoutEvent, ObserverHandle};

fn names(log: &common::EventLog) -> Vec<String> {
    log.borrow().iter().map(|(name, _)| name.clone()).collect()
}

#[test]
fn test_unknown_event_runs_no_callbacks() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();
    observe(&mut layout, "first", &log);
    observe(&mut layout, "second", &log);

    let err = layout.notify_observers_named("bogus").unwrap_err();
    assert!(matches!(err, LayoutError::UnknownEvent(ref name) if name == "bogus"));
    assert_eq!(err.to_string(), "Table Layout don't have event bogus.");
    assert!(log.borrow().is_empty());
}

#[test]
fn test_named_dispatch() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();
    let recorder = observe(&mut layout, "r", &log);

    layout.notify_observers_named("columns").unwrap();
    layout.notify_observers_named("scrollable").unwrap();
    assert_eq!(recorder.borrow().count(LayoutEvent::Columns), 1);
    assert_eq!(recorder.borrow().count(LayoutEvent::Scrollable), 1);
}

#[test]
fn test_dispatch_follows_registration_order() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();
    observe(&mut layout, "first", &log);
    observe(&mut layout, "second", &log);
    observe(&mut layout, "third", &log);

    layout.notify_observers(LayoutEvent::Scrollable).unwrap();
    assert_eq!(names(&log), vec!["first", "second", "third"]);
}

#[test]
fn test_failing_observer_stops_dispatch() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();
    let first = observe(&mut layout, "first", &log);
    observe(&mut layout, "second", &log);
    first.borrow_mut().fail = true;

    let err = layout.notify_observers(LayoutEvent::Columns).unwrap_err();
    assert_eq!(err.to_string(), "Observer failed: first failed");
    assert_eq!(names(&log), vec!["first"]);
}

#[test]
fn test_busy_observer_is_an_error() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();
    let recorder = observe(&mut layout, "r", &log);

    let _held = recorder.borrow();
    let err = layout.notify_observers(LayoutEvent::Columns).unwrap_err();
    assert!(matches!(err, LayoutError::Observer(_)));
}

#[test]
fn test_remove_observer_by_identity() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let log = new_log();

    let recorder = Recorder::new("twice", &log);
    let concrete = Rc::clone(&recorder);
    let handle: ObserverHandle = concrete;
    layout.add_observer(Rc::clone(&handle));
    layout.add_observer(Rc::clone(&handle));
    observe(&mut layout, "other", &log);

    assert!(layout.remove_observer(&handle));
    layout.notify_observers(LayoutEvent::Columns).unwrap();
    assert_eq!(names(&log), vec!["twice", "other"]);

    assert!(layout.remove_observer(&handle));
    assert!(!layout.remove_observer(&handle));

    log.borrow_mut().clear();
    layout.notify_observers(LayoutEvent::Columns).unwrap();
    assert_eq!(names(&log), vec!["other"]);
}

#[test]
fn test_callbacks_with_single_hook() {
    let surface = FakeSurface::visible();
    let mut layout = build_layout(&surface, three_columns());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    let handle = Callbacks::new()
        .on_columns(move |layout| {
            sink.borrow_mut().push(layout.state().body_width);
            Ok(())
        })
        .into_handle();
    layout.add_observer(handle);

    layout.notify_observers(LayoutEvent::Scrollable).unwrap();
    assert!(seen.borrow().is_empty());

    layout.update_columns_width().unwrap();
    assert_eq!(*seen.borrow(), vec![Some(300.0)]);
}
