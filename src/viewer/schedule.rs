//! Browser scheduling for deferred layout passes.
//!
//! Microtask work drains from a `spawn_local` future (queued behind the
//! current synchronous work); frame work drains from `requestAnimationFrame`.
//! Work queued while a drain is running waits for the next frame instead, so
//! a table that stays detached is polled once per frame rather than spinning
//! the microtask queue.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::engine::TableLayout;
use crate::scheduler::{Scheduler, Tick};

/// Weak slot pointing at the engine that owns the scheduler
pub(crate) type LayoutSlot = Rc<RefCell<Weak<RefCell<TableLayout>>>>;

#[derive(Clone)]
struct DrainTarget {
    layout: LayoutSlot,
    /// True while a drain is running
    draining: Rc<Cell<bool>>,
}

pub(crate) struct BrowserScheduler {
    target: DrainTarget,
}

impl BrowserScheduler {
    pub(crate) fn new(layout: LayoutSlot) -> Self {
        Self {
            target: DrainTarget {
                layout,
                draining: Rc::new(Cell::new(false)),
            },
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn wake(&mut self, tick: Tick) {
        let on_frame = tick == Tick::Frame || self.target.draining.get();
        schedule(self.target.clone(), tick, on_frame);
    }
}

fn schedule(target: DrainTarget, tick: Tick, on_frame: bool) {
    if !on_frame {
        wasm_bindgen_futures::spawn_local(async move { drain(&target, tick) });
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || drain(&target, tick));
    if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
        log::warn!("requestAnimationFrame failed: {e:?}");
    }
}

fn drain(target: &DrainTarget, tick: Tick) {
    let Some(layout) = target.layout.borrow().upgrade() else {
        return;
    };
    let result = match layout.try_borrow_mut() {
        Ok(mut engine) => {
            target.draining.set(true);
            let result = engine.run_pending(tick);
            target.draining.set(false);
            result
        }
        Err(_) => {
            // Engine is mid-call; its queue still holds the work
            schedule(target.clone(), tick, true);
            return;
        }
    };
    if let Err(e) = result {
        web_sys::console::error_1(&e.to_string().into());
    }
}
