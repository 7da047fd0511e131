use std::collections::BTreeMap;
use std::sync::mpsc;

use sct_logging::sct_trace;

use crate::{ConsoleEntry, Effect, Slice, StateStore, SystemStatus, TestRecord};

/// Snapshot of one slice, sent to that slice's subscribers after it changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceUpdate {
    Status(SystemStatus),
    TestRecords(Vec<TestRecord>),
    Console(Vec<ConsoleEntry>),
}

impl SliceUpdate {
    pub fn slice(&self) -> Slice {
        match self {
            SliceUpdate::Status(_) => Slice::Status,
            SliceUpdate::TestRecords(_) => Slice::TestRecords,
            SliceUpdate::Console(_) => Slice::Console,
        }
    }

    fn snapshot(slice: Slice, state: &StateStore) -> Self {
        match slice {
            Slice::Status => SliceUpdate::Status(state.status().clone()),
            Slice::TestRecords => SliceUpdate::TestRecords(state.test_records().to_vec()),
            Slice::Console => SliceUpdate::Console(state.console().to_vec()),
        }
    }
}

/// Per-slice subscriber registry.
///
/// Every subscriber of a slice receives that slice's updates in the order the
/// effects were published. Receivers that were dropped are pruned on the next
/// publish to their slice.
#[derive(Debug, Default)]
pub struct Publisher {
    subscribers: BTreeMap<Slice, Vec<mpsc::Sender<SliceUpdate>>>,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, slice: Slice) -> mpsc::Receiver<SliceUpdate> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.entry(slice).or_default().push(tx);
        rx
    }

    pub fn subscriber_count(&self, slice: Slice) -> usize {
        self.subscribers.get(&slice).map_or(0, Vec::len)
    }

    /// Sends a snapshot for every effect; returns the number of deliveries.
    pub fn publish(&mut self, effects: &[Effect], state: &StateStore) -> usize {
        let mut delivered = 0;
        for effect in effects {
            let Effect::Publish(slice) = *effect;
            let Some(senders) = self.subscribers.get_mut(&slice) else {
                continue;
            };
            let update = SliceUpdate::snapshot(slice, state);
            senders.retain(|tx| tx.send(update.clone()).is_ok());
            delivered += senders.len();
            sct_trace!("published {:?} to {} subscribers", slice, senders.len());
        }
        delivered
    }
}
