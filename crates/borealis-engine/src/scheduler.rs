//! Animation scheduling.
//!
//! A single repeating tick drives every registered effect. Callbacks are
//! held in insertion order and invoked in that order each tick; the
//! scheduler starts when the first callback registers and stops when the
//! last one unregisters. Pausing keeps the tick chain alive but invokes
//! nothing, so resume is instant. A failing callback is logged and skipped
//! for that tick only.
//!
//! The scheduler never owns a timer: an outer loop (or a test) calls
//! [`AnimationScheduler::tick`] with the elapsed time, which keeps stepping
//! deterministic.

use tracing::{debug, error, info};

use borealis_common::EffectResult;

/// A per-tick animation callback. Receives the tick's delta time in seconds.
pub type TickCallback = Box<dyn FnMut(f32) -> EffectResult<()>>;

/// Named-callback registry driven by a single repeating tick.
#[derive(Default)]
pub struct AnimationScheduler {
    callbacks: Vec<(String, TickCallback)>,
    running: bool,
    paused: bool,
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("callbacks", &self.callback_names())
            .field("running", &self.running)
            .field("paused", &self.paused)
            .finish()
    }
}

impl AnimationScheduler {
    /// Creates a stopped scheduler with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback under `name` and starts the scheduler if it was
    /// stopped. Registering an existing name replaces the callback but keeps
    /// its position in the invocation order.
    pub fn register(&mut self, name: impl Into<String>, callback: TickCallback) {
        let name = name.into();
        if let Some(slot) = self.callbacks.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = callback;
            debug!(name = %name, "animation callback replaced");
        } else {
            debug!(name = %name, "animation callback registered");
            self.callbacks.push((name, callback));
        }

        if !self.running {
            self.running = true;
            info!("animation scheduler started");
        }
    }

    /// Removes the callback registered under `name`; stops the scheduler
    /// when the last one goes. Returns whether a callback was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(n, _)| n != name);
        let removed = self.callbacks.len() != before;

        if removed && self.callbacks.is_empty() {
            self.stop();
        }
        removed
    }

    /// Stops the tick chain. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!("animation scheduler stopped");
        }
    }

    /// Whether the scheduler currently ticks.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Suspends callback invocation without stopping the tick chain.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes callback invocation on the next tick.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether callbacks are currently suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Registered callback names in invocation order.
    #[must_use]
    pub fn callback_names(&self) -> Vec<&str> {
        self.callbacks.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Runs one tick.
    ///
    /// Returns false when the scheduler is stopped (the chain is dead).
    /// While paused the chain stays alive but no callback runs. A callback
    /// returning an error is logged with its name and skipped for this tick;
    /// it stays registered and runs again next tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        if self.paused {
            return true;
        }

        for (name, callback) in &mut self.callbacks {
            if let Err(err) = callback(dt) {
                error!(name = %name, %err, "animation callback failed");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use borealis_common::EffectError;

    fn counter_callback(counter: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> TickCallback {
        let counter = Rc::clone(counter);
        Box::new(move |_dt| {
            counter.borrow_mut().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_register_starts_and_unregister_last_stops() {
        let mut scheduler = AnimationScheduler::new();
        assert!(!scheduler.is_running());
        assert!(!scheduler.tick(0.016));

        scheduler.register("snow", Box::new(|_| Ok(())));
        assert!(scheduler.is_running());
        assert!(scheduler.tick(0.016));

        assert!(scheduler.unregister("snow"));
        assert!(!scheduler.is_running());
        assert!(!scheduler.tick(0.016));

        // Re-registering from Stopped restarts the chain.
        scheduler.register("snow", Box::new(|_| Ok(())));
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = AnimationScheduler::new();
        scheduler.register("stars", counter_callback(&calls, "stars"));
        scheduler.register("snow", counter_callback(&calls, "snow"));
        scheduler.register("moon", counter_callback(&calls, "moon"));

        scheduler.tick(0.016);
        scheduler.tick(0.016);

        assert_eq!(
            *calls.borrow(),
            vec!["stars", "snow", "moon", "stars", "snow", "moon"]
        );
    }

    #[test]
    fn test_replacing_callback_keeps_its_slot() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = AnimationScheduler::new();
        scheduler.register("stars", counter_callback(&calls, "stars"));
        scheduler.register("snow", counter_callback(&calls, "snow"));
        scheduler.register("stars", counter_callback(&calls, "stars-v2"));

        scheduler.tick(0.016);
        assert_eq!(*calls.borrow(), vec!["stars-v2", "snow"]);
        assert_eq!(scheduler.callback_names(), vec!["stars", "snow"]);
    }

    #[test]
    fn test_failing_callback_is_isolated_and_retried() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = AnimationScheduler::new();

        let fail_calls = Rc::clone(&calls);
        scheduler.register(
            "broken",
            Box::new(move |_| {
                fail_calls.borrow_mut().push("broken");
                Err(EffectError::Draw("boom".into()))
            }),
        );
        scheduler.register("healthy", counter_callback(&calls, "healthy"));

        scheduler.tick(0.016);
        scheduler.tick(0.016);

        // The failing callback ran both ticks and never blocked the healthy
        // one.
        assert_eq!(
            *calls.borrow(),
            vec!["broken", "healthy", "broken", "healthy"]
        );
    }

    #[test]
    fn test_pause_skips_callbacks_but_keeps_chain_alive() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = AnimationScheduler::new();
        scheduler.register("snow", counter_callback(&calls, "snow"));

        scheduler.pause();
        assert!(scheduler.tick(0.016));
        assert!(scheduler.tick(0.016));
        assert!(calls.borrow().is_empty());

        scheduler.resume();
        assert!(scheduler.tick(0.016));
        assert_eq!(*calls.borrow(), vec!["snow"]);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.register("snow", Box::new(|_| Ok(())));
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_unregister_missing_name() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.register("snow", Box::new(|_| Ok(())));
        assert!(!scheduler.unregister("rain"));
        assert!(scheduler.is_running());
    }
}
