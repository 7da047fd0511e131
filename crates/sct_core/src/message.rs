use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Wire tag of a system status message.
pub const KIND_STATUS: &str = "status";
/// Wire tag of a test result batch message.
pub const KIND_TEST_RESULTS: &str = "testresults";
/// Wire tag of a console log message.
pub const KIND_LOGS: &str = "logs";

/// One element of a test result batch. Stored exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestRecord(pub Value);

/// Latest status object reported by the tester master.
///
/// The object is not validated; the readers below return `None` when a field
/// is absent or carries an unexpected JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemStatus(pub Value);

impl Default for SystemStatus {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl SystemStatus {
    pub fn state(&self) -> Option<&str> {
        self.0.get("state").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error_message").and_then(Value::as_str)
    }

    pub fn device_id(&self) -> Option<&str> {
        self.0.get("device_id").and_then(Value::as_str)
    }

    pub fn sites(&self) -> Option<Vec<&str>> {
        self.0
            .get("sites")
            .and_then(Value::as_array)
            .map(|sites| sites.iter().filter_map(Value::as_str).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ConsoleEntry {
    pub fn new(
        date: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Parse a log line of the form `date|type|description`.
    ///
    /// `\\`, `\|`, `\n` and `\r` are unescaped in every field. An unescaped
    /// `|` after the second separator belongs to the description. Only the
    /// trailing line terminator is stripped.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields: Vec<String> = Vec::with_capacity(3);
        let mut current = String::new();
        let mut chars = line.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some('n') => current.push('\n'),
                    Some('r') => current.push('\r'),
                    Some(escaped @ ('\\' | '|')) => current.push(escaped),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => current.push('\\'),
                },
                '|' if fields.len() < 2 => fields.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            }
        }
        if fields.len() < 2 {
            return None;
        }
        let kind = fields.pop()?;
        let date = fields.pop()?;
        Some(Self {
            date,
            kind,
            description: current,
        })
    }

    /// Inverse of [`ConsoleEntry::parse_line`]; the result never contains a newline.
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(
            self.date.len() + self.kind.len() + self.description.len() + 2,
        );
        push_escaped(&mut line, &self.date);
        line.push('|');
        push_escaped(&mut line, &self.kind);
        line.push('|');
        push_escaped(&mut line, &self.description);
        line
    }
}

fn push_escaped(out: &mut String, field: &str) {
    for ch in field.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
}

/// A message pushed by the tester master, classified by its `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Status(SystemStatus),
    /// Batches of records; an empty list is a reset signal.
    TestResults(Vec<Vec<TestRecord>>),
    Logs(Vec<ConsoleEntry>),
    /// Any tag this monitor does not know about.
    Unknown { kind: String, payload: Value },
}

impl Message {
    pub fn kind(&self) -> &str {
        match self {
            Message::Status(_) => KIND_STATUS,
            Message::TestResults(_) => KIND_TEST_RESULTS,
            Message::Logs(_) => KIND_LOGS,
            Message::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// Wire representation: `{ "type": ..., "payload": ... }`.
    pub fn to_value(&self) -> Value {
        let payload = match self {
            Message::Status(status) => status.0.clone(),
            Message::TestResults(batches) => json!(batches),
            Message::Logs(entries) => json!(entries),
            Message::Unknown { payload, .. } => payload.clone(),
        };
        json!({ "type": self.kind(), "payload": payload })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MessageDecodeError {
    #[error("message is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("message is not a JSON object")]
    NotAnObject,
    #[error("message has no string `type` tag")]
    MissingType,
    #[error("payload of `{kind}` message has the wrong shape: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one wire message from JSON text.
pub fn decode_message(text: &str) -> Result<Message, MessageDecodeError> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(value)
}

/// Decode one wire message from an already parsed JSON value.
///
/// Recognized tags must carry a payload of the expected shape; a test result
/// batch list with any non-array element is rejected as a whole. Status
/// payloads are accepted as any JSON value.
pub fn decode_value(value: Value) -> Result<Message, MessageDecodeError> {
    let Value::Object(mut object) = value else {
        return Err(MessageDecodeError::NotAnObject);
    };
    let kind = match object.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        _ => return Err(MessageDecodeError::MissingType),
    };
    let payload = object.remove("payload").unwrap_or(Value::Null);

    let payload_err = |source: serde_json::Error| MessageDecodeError::Payload {
        kind: kind.clone(),
        source,
    };
    let message = match kind.as_str() {
        KIND_STATUS => Message::Status(SystemStatus(payload)),
        KIND_TEST_RESULTS => {
            Message::TestResults(serde_json::from_value(payload).map_err(payload_err)?)
        }
        KIND_LOGS => Message::Logs(serde_json::from_value(payload).map_err(payload_err)?),
        _ => Message::Unknown {
            kind: kind.clone(),
            payload,
        },
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_keeps_unescaped_pipes_in_description() {
        let entry = ConsoleEntry::parse_line("01/02/2024 10:00:00|info|site 0 | ready \r\n").unwrap();
        assert_eq!(entry.date, "01/02/2024 10:00:00");
        assert_eq!(entry.kind, "info");
        assert_eq!(entry.description, "site 0 | ready ");
    }

    #[test]
    fn to_line_escapes_separators_and_newlines() {
        let entry = ConsoleEntry::new("d|1", "IN\\FO", "a\nb\rc|d");
        let line = entry.to_line();
        assert_eq!(line, "d\\|1|IN\\\\FO|a\\nb\\rc\\|d");
        assert!(!line.contains('\n'));
        assert_eq!(ConsoleEntry::parse_line(&line), Some(entry));
    }

    #[test]
    fn parse_line_rejects_short_lines() {
        assert_eq!(ConsoleEntry::parse_line("no separators"), None);
        assert_eq!(ConsoleEntry::parse_line("date|info"), None);
    }

    #[test]
    fn status_readers_tolerate_garbage() {
        let status = SystemStatus(json!({ "state": 3, "sites": ["0", 1, "2"] }));
        assert_eq!(status.state(), None);
        assert_eq!(status.error_message(), None);
        assert_eq!(status.sites(), Some(vec!["0", "2"]));

        let not_an_object = SystemStatus(json!("broken"));
        assert_eq!(not_an_object.device_id(), None);
        assert_eq!(not_an_object.sites(), None);
    }
}
