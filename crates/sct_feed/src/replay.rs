use std::fs;
use std::path::Path;

use sct_core::{decode_message, decode_value, Message};
use sct_logging::sct_info;
use serde_json::Value;

use crate::ReplayError;

/// Load a recorded message stream from disk. See [`parse_replay`].
pub fn load_replay(path: &Path) -> Result<Vec<Message>, ReplayError> {
    let text = fs::read_to_string(path)?;
    let messages = parse_replay(&text)?;
    sct_info!("loaded {} messages from {:?}", messages.len(), path);
    Ok(messages)
}

/// Parse either a JSON array of messages or newline-delimited JSON.
///
/// Blank NDJSON lines are skipped; line numbers in errors are 1-based.
pub fn parse_replay(text: &str) -> Result<Vec<Message>, ReplayError> {
    if text.trim_start().starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(text).map_err(ReplayError::Array)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                decode_value(value).map_err(|source| ReplayError::Element { index, source })
            })
            .collect();
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            decode_message(line).map_err(|source| ReplayError::Line {
                line: idx + 1,
                source,
            })
        })
        .collect()
}
