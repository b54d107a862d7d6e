//! JSONL transcript of engine events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type` and
//! `timestamp`. The file is opened in append mode so restarts extend the same
//! transcript.

use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use toolrun_application::{ConversationEvent, ConversationLogger};
use tracing::warn;

/// JSONL logger writing one engine event per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; the engine then runs
    /// without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(path = %parent.display(), error = %e, "Could not create transcript directory");
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not open transcript file");
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Object payloads gain `type`/`timestamp`; anything else is wrapped as `data`.
fn to_record(event: ConversationEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert("type".to_string(), Value::String(event.event_type.to_string()));
    record.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(record)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let event_type = event.event_type;

        let Ok(line) = serde_json::to_string(&to_record(event, timestamp)) else {
            return;
        };

        match self.writer.lock() {
            Ok(mut writer) => {
                if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                    warn!(event = event_type, error = %e, "Failed to write transcript line");
                }
            }
            Err(_) => warn!(event = event_type, "Transcript writer lock poisoned"),
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "tool_dispatch",
            json!({"thread_id": "thread-1", "standalone": 2, "workflow": 0, "mcp": 0}),
        ));
        logger.log(ConversationEvent::new(
            "aggregated_result",
            json!({"thread_id": "thread-1", "blocks": ["a", "b"]}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "tool_dispatch");
        assert_eq!(records[0]["standalone"], 2);
        assert_eq!(records[1]["type"], "aggregated_result");
        assert_eq!(records[1]["blocks"], json!(["a", "b"]));

        let stamp = records[0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_non_object_payload_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("tool_result", json!(["x"])));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "tool_result");
        assert_eq!(records[0]["data"], json!(["x"]));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("engine.jsonl");

        let first = JsonlConversationLogger::new(&path).unwrap();
        first.log(ConversationEvent::new("tool_handoff", json!({"to": "agent-2"})));
        drop(first);

        let second = JsonlConversationLogger::new(&path).unwrap();
        assert_eq!(second.path(), path.as_path());
        second.log(ConversationEvent::new("tool_handoff", json!({"to": "agent-3"})));
        drop(second);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["to"], "agent-3");
    }

    #[test]
    fn test_directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlConversationLogger::new(dir.path()).is_none());
    }
}
