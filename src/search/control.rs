//! Cooperative run control for interactive front ends.
//!
//! A controller thread flips the state; the search polls [`SearchControl::checkpoint`]
//! once per iteration. Pausing blocks the search thread, stepping releases
//! exactly one iteration before re-pausing, and stopping makes the search
//! wind up as if it had exhausted its options.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const PAUSED: u8 = 2;
const STEPPING: u8 = 3;
const STOPPED: u8 = 4;

const PAUSE_POLL: Duration = Duration::from_millis(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Running,
    Paused,
    Stepping,
    Stopped,
}

#[derive(Debug, Default)]
pub struct SearchControl {
    state: AtomicU8,
}

impl SearchControl {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(IDLE),
        }
    }

    pub fn state(&self) -> ControlState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => ControlState::Running,
            PAUSED => ControlState::Paused,
            STEPPING => ControlState::Stepping,
            STOPPED => ControlState::Stopped,
            _ => ControlState::Idle,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == ControlState::Stopped
    }

    /// Ask the search to block at its next checkpoint.
    pub fn request_pause(&self) {
        self.transition(PAUSED);
    }

    /// Release exactly one iteration, then pause again.
    pub fn request_step(&self) {
        self.transition(STEPPING);
    }

    /// Abort the search. Sticky until [`SearchControl::reset`].
    pub fn request_stop(&self) {
        self.state.store(STOPPED, Ordering::Release);
    }

    pub fn resume(&self) {
        self.transition(RUNNING);
    }

    /// Re-arm a controller whose search has finished or been stopped.
    pub fn reset(&self) {
        self.state.store(IDLE, Ordering::Release);
    }

    /// Called by the search once per iteration. Blocks while paused.
    /// Returns false when the search must abort.
    pub fn checkpoint(&self) -> bool {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    let _ = self.state.compare_exchange(
                        IDLE,
                        RUNNING,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    );
                }
                RUNNING => return true,
                STEPPING => {
                    if self
                        .state
                        .compare_exchange(STEPPING, PAUSED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return true;
                    }
                }
                PAUSED => std::thread::sleep(PAUSE_POLL),
                _ => return false,
            }
        }
    }

    // Controller-side transitions never overwrite a stop.
    fn transition(&self, to: u8) {
        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current != STOPPED).then_some(to)
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn idle_checkpoint_starts_running() {
        let control = SearchControl::new();
        assert!(control.checkpoint());
        assert_eq!(control.state(), ControlState::Running);
    }

    #[test]
    fn step_releases_one_iteration_then_pauses() {
        let control = SearchControl::new();
        control.request_pause();
        control.request_step();
        assert!(control.checkpoint());
        assert_eq!(control.state(), ControlState::Paused);
    }

    #[test]
    fn stop_wins_over_later_requests() {
        let control = SearchControl::new();
        control.request_stop();
        control.request_pause();
        control.resume();
        assert!(!control.checkpoint());
        control.reset();
        assert_eq!(control.state(), ControlState::Idle);
    }

    #[test]
    fn pause_blocks_until_resumed() {
        let control = Arc::new(SearchControl::new());
        control.request_pause();
        let (done_tx, done_rx) = mpsc::channel();
        let shared = Arc::clone(&control);
        let handle = std::thread::spawn(move || {
            let passed = shared.checkpoint();
            done_tx.send(()).unwrap();
            passed
        });
        assert!(done_rx.recv_timeout(Duration::from_millis(50)).is_err());
        let released = Instant::now();
        control.resume();
        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(released.elapsed() < Duration::from_secs(5));
        assert!(handle.join().unwrap());
    }
}
