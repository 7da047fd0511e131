use crate::view_model::MonitorViewModel;
use crate::{ConsoleEntry, SystemStatus, TestRecord};

/// Normalized monitor state: one status record, the accumulated test records
/// and the console log. Each slice is written only by its handler in `update`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateStore {
    status: SystemStatus,
    records: Vec<TestRecord>,
    console: Vec<ConsoleEntry>,
    dirty: bool,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    pub fn test_records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn console(&self) -> &[ConsoleEntry] {
        &self.console
    }

    pub fn view(&self) -> MonitorViewModel {
        MonitorViewModel {
            state: self.status.state().map(ToOwned::to_owned),
            error_message: self.status.error_message().map(ToOwned::to_owned),
            record_count: self.records.len(),
            console: self.console.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn apply_status(&mut self, status: SystemStatus) {
        self.status = status;
        self.dirty = true;
    }

    /// Appends every batch in order, or resets when `batches` is empty.
    pub(crate) fn apply_test_results(&mut self, batches: Vec<Vec<TestRecord>>) {
        if batches.is_empty() {
            self.records.clear();
        } else {
            self.records.extend(batches.into_iter().flatten());
        }
        self.dirty = true;
    }

    /// Returns false when there was nothing to append.
    pub(crate) fn append_log_entries(&mut self, entries: Vec<ConsoleEntry>) -> bool {
        if entries.is_empty() {
            return false;
        }
        self.console.extend(entries);
        self.dirty = true;
        true
    }

    /// Returns false when the console was already empty.
    pub(crate) fn clear_console(&mut self) -> bool {
        if self.console.is_empty() {
            return false;
        }
        self.console.clear();
        self.dirty = true;
        true
    }
}
