//! Deferred work for the height settling protocol.
//!
//! Retries are queued as plain [`Task`] values on one of two ticks instead
//! of closures, so tests can drive the state machine deterministically by
//! draining a tick at a time. A [`Scheduler`] is told when a tick gains
//! pending work; in the browser it arranges for the tick to be drained.

use std::collections::VecDeque;

use crate::types::{HeightProperty, HeightValue};

/// When a deferred task runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    /// After the current synchronous work, before the next paint
    Microtask,
    /// On the next animation frame
    Frame,
}

/// Deferred engine work
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Run another height settling pass
    UpdateHeights,
    /// Apply a height that arrived before the table was attached
    ApplyHeight {
        value: HeightValue,
        property: HeightProperty,
    },
}

/// Pending tasks for both ticks
#[derive(Debug, Default)]
pub struct TaskQueue {
    microtasks: VecDeque<Task>,
    frames: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task. Returns true if the tick had nothing pending before.
    ///
    /// A settling pass already queued for the tick absorbs a new one, since
    /// each pass re-reads live measurements when it runs.
    pub fn push(&mut self, tick: Tick, task: Task) -> bool {
        let queue = self.queue_mut(tick);
        let was_empty = queue.is_empty();
        if task == Task::UpdateHeights && queue.contains(&Task::UpdateHeights) {
            return false;
        }
        queue.push_back(task);
        was_empty
    }

    /// Take every task currently queued for `tick`.
    ///
    /// Tasks queued while the returned batch runs belong to the next tick.
    pub fn take(&mut self, tick: Tick) -> Vec<Task> {
        self.queue_mut(tick).drain(..).collect()
    }

    pub fn pending(&self, tick: Tick) -> usize {
        match tick {
            Tick::Microtask => self.microtasks.len(),
            Tick::Frame => self.frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.microtasks.is_empty() && self.frames.is_empty()
    }

    fn queue_mut(&mut self, tick: Tick) -> &mut VecDeque<Task> {
        match tick {
            Tick::Microtask => &mut self.microtasks,
            Tick::Frame => &mut self.frames,
        }
    }
}

/// Hook notified when a tick gains pending work
pub trait Scheduler {
    fn wake(&mut self, tick: Tick);
}

/// Scheduler for hosts that drain ticks themselves (tests, native embedders)
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualScheduler;

impl Scheduler for ManualScheduler {
    fn wake(&mut self, _tick: Tick) {}
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_push_reports_first_task() {
        let mut queue = TaskQueue::new();
        assert!(queue.push(Tick::Microtask, Task::UpdateHeights));
        assert!(!queue.push(
            Tick::Microtask,
            Task::ApplyHeight {
                value: HeightValue::Pixels(100.0),
                property: HeightProperty::Height,
            },
        ));
        assert!(queue.push(Tick::Frame, Task::UpdateHeights));
        assert_eq!(queue.pending(Tick::Microtask), 2);
        assert_eq!(queue.pending(Tick::Frame), 1);
    }

    #[test]
    fn test_settling_passes_coalesce_per_tick() {
        let mut queue = TaskQueue::new();
        assert!(queue.push(Tick::Microtask, Task::UpdateHeights));
        assert!(!queue.push(Tick::Microtask, Task::UpdateHeights));
        assert!(!queue.push(Tick::Microtask, Task::UpdateHeights));
        assert_eq!(queue.pending(Tick::Microtask), 1);

        // Height applies are distinct work and always queue
        let apply = Task::ApplyHeight {
            value: HeightValue::Pixels(100.0),
            property: HeightProperty::Height,
        };
        queue.push(Tick::Microtask, apply.clone());
        queue.push(Tick::Microtask, apply);
        assert_eq!(queue.pending(Tick::Microtask), 3);

        queue.take(Tick::Microtask);
        assert!(queue.push(Tick::Microtask, Task::UpdateHeights));
    }

    #[test]
    fn test_take_drains_only_one_tick() {
        let mut queue = TaskQueue::new();
        queue.push(Tick::Microtask, Task::UpdateHeights);
        queue.push(
            Tick::Frame,
            Task::ApplyHeight {
                value: HeightValue::Pixels(200.0),
                property: HeightProperty::Height,
            },
        );

        let batch = queue.take(Tick::Microtask);
        assert_eq!(batch, vec![Task::UpdateHeights]);
        assert_eq!(queue.pending(Tick::Microtask), 0);
        assert!(!queue.is_empty());

        queue.take(Tick::Frame);
        assert!(queue.is_empty());
    }
}
