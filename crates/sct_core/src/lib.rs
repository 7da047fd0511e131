//! mini-sct core: wire messages, slice state and the pure reconciliation step.
mod effect;
mod message;
mod msg;
mod publish;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Slice};
pub use message::{
    decode_message, decode_value, ConsoleEntry, Message, MessageDecodeError, SystemStatus,
    TestRecord, KIND_LOGS, KIND_STATUS, KIND_TEST_RESULTS,
};
pub use msg::Msg;
pub use publish::{Publisher, SliceUpdate};
pub use state::StateStore;
pub use update::update;
pub use view_model::MonitorViewModel;
