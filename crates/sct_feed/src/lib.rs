//! mini-sct feed: asynchronous message delivery and the session loop.
mod error;
mod export;
mod replay;
mod session;
mod source;

pub use error::{ExportError, ReplayError, SourceError};
pub use export::{load_console_export, ConsoleExporter};
pub use replay::{load_replay, parse_replay};
pub use session::MonitorSession;
pub use source::{MessageSource, SourceSettings};
