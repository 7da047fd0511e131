use sct_logging::{sct_debug, sct_trace};

use crate::{Effect, Message, Msg, Slice, StateStore};

/// Pure update function: classifies a message, reconciles it into exactly one
/// slice and returns the publish effects for the slices that changed.
pub fn update(mut state: StateStore, msg: Msg) -> (StateStore, Vec<Effect>) {
    let effects = match msg {
        Msg::Server(message) => reconcile(&mut state, message),
        Msg::ClearConsoleClicked => {
            if state.clear_console() {
                vec![Effect::Publish(Slice::Console)]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn reconcile(state: &mut StateStore, message: Message) -> Vec<Effect> {
    match message {
        Message::Status(status) => {
            sct_trace!("status update state={:?}", status.state());
            state.apply_status(status);
            vec![Effect::Publish(Slice::Status)]
        }
        Message::TestResults(batches) => {
            if batches.is_empty() {
                sct_debug!("test results reset ({} records dropped)", state.record_count());
            }
            state.apply_test_results(batches);
            vec![Effect::Publish(Slice::TestRecords)]
        }
        Message::Logs(entries) => {
            if state.append_log_entries(entries) {
                vec![Effect::Publish(Slice::Console)]
            } else {
                Vec::new()
            }
        }
        Message::Unknown { kind, .. } => {
            // Newer masters may send kinds this monitor does not know yet.
            sct_debug!("ignoring message type {:?}", kind);
            Vec::new()
        }
    }
}
