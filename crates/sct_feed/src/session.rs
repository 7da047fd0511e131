use std::sync::mpsc;
use std::time::{Duration, Instant};

use sct_core::{update, Effect, Msg, Publisher, Slice, SliceUpdate, StateStore};
use sct_logging::{sct_debug, set_turn};

use crate::MessageSource;

const POLL_SLICE: Duration = Duration::from_millis(5);

/// Single-threaded reconciliation loop over an injected state store.
///
/// Messages arrive from the source on its own thread; they are reconciled
/// here one at a time and the resulting slice snapshots are published to
/// subscribers before the next message is taken.
pub struct MonitorSession {
    state: StateStore,
    publisher: Publisher,
    source: MessageSource,
    turn: u64,
}

impl MonitorSession {
    pub fn new(state: StateStore, source: MessageSource) -> Self {
        Self {
            state,
            publisher: Publisher::new(),
            source,
            turn: 0,
        }
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn source(&self) -> &MessageSource {
        &self.source
    }

    /// Number of messages reconciled so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn subscribe(&mut self, slice: Slice) -> mpsc::Receiver<SliceUpdate> {
        self.publisher.subscribe(slice)
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Applies one message and publishes the slices it changed.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        if matches!(msg, Msg::Server(_)) {
            self.turn += 1;
            set_turn(self.turn);
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.publisher.publish(&effects, &self.state);
        effects
    }

    /// Reconciles every message delivered so far; returns how many were taken.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(message) = self.source.try_recv() {
            self.dispatch(Msg::Server(message));
            processed += 1;
        }
        processed
    }

    /// Keeps reconciling until `converged` holds for the store or `timeout`
    /// elapses. Returns whether the store converged. A timeout too large to
    /// represent as a deadline (e.g. `Duration::MAX`) waits indefinitely.
    pub fn wait_until<F>(&mut self, timeout: Duration, converged: F) -> bool
    where
        F: Fn(&StateStore) -> bool,
    {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            self.pump();
            if converged(&self.state) {
                return true;
            }
            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    (deadline - now).min(POLL_SLICE)
                }
                None => POLL_SLICE,
            };
            if let Some(message) = self.source.recv_timeout(wait) {
                self.dispatch(Msg::Server(message));
            }
        }
    }

    /// Reconciles until the source backlog is empty and nothing has arrived
    /// for `idle`. Returns the number of messages reconciled.
    pub fn run_until_idle(&mut self, idle: Duration) -> usize {
        let mut processed = 0;
        loop {
            match self.source.recv_timeout(idle) {
                Some(message) => {
                    self.dispatch(Msg::Server(message));
                    processed += 1;
                }
                None if self.source.pending() == 0 => {
                    processed += self.pump();
                    break;
                }
                None => {}
            }
        }
        sct_debug!("session idle after {} messages", processed);
        processed
    }

    pub fn into_state(self) -> StateStore {
        self.state
    }
}
