//! Replay of recorded message logs.
//!
//! A log is JSON lines, one inbound message per line:
//!
//! ```text
//! {"origin": "self", "at": 1715331600000, "kind": "text", "text": "hi"}
//! {"origin": "peer", "at": 1715331660000, "kind": "audio", "uri": "v.m4a", "duration_ms": 4000}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::clock::ManualClock;
use crate::conversation::Conversation;
use crate::entry::{Origin, Payload, Timestamp};
use crate::timeline::{GroupingPolicy, Timeline};

/// Error type for replay input.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One message from a replay log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRecord {
    /// Local or peer.
    pub origin: Origin,
    /// Arrival time.
    pub at: Timestamp,
    /// Message data.
    #[serde(flatten)]
    pub payload: Payload,
}

/// Parse a JSON-lines log.
pub fn parse_records(input: &str) -> Result<Vec<InboundRecord>, ReplayError> {
    let mut records = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Read and parse a JSON-lines log from disk.
pub fn load_records(path: &Path) -> Result<Vec<InboundRecord>, ReplayError> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Feed records through a conversation in file order.
pub fn replay<I>(records: I, policy: GroupingPolicy) -> Timeline
where
    I: IntoIterator<Item = InboundRecord>,
{
    let clock = ManualClock::default();
    let mut conversation = Conversation::with_clock(&clock, policy);
    let mut clamped = 0usize;

    for record in records {
        clock.set(record.at);
        if conversation
            .record(record.origin, record.payload)
            .is_some_and(|outcome| outcome.clamped)
        {
            clamped += 1;
        }
    }

    let timeline = conversation.into_timeline();
    info!(
        entries = timeline.len(),
        separators = timeline.separator_count(),
        clamped,
        "Replay complete"
    );
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ChatEntry;

    const LOG: &str = r#"
# morning chat
{"origin": "self", "at": 0, "kind": "text", "text": "hi"}
{"origin": "peer", "at": 60000, "kind": "image", "uri": "content://media/3"}

{"origin": "peer", "at": 170000, "kind": "audio", "uri": "voice.m4a", "duration_ms": 4000}
{"origin": "self", "at": 400000, "kind": "file", "name": "a.pdf", "uri": "content://a", "size": 10, "mime_type": "application/pdf"}
{"origin": "self", "at": 410000, "kind": "video", "uri": "clip.mp4"}
"#;

    #[test]
    fn test_parse_records() {
        let records = parse_records(LOG).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].origin, Origin::Local);
        assert_eq!(records[0].payload, Payload::text("hi"));
        assert_eq!(records[2].payload, Payload::audio("voice.m4a", 4000));
        assert_eq!(records[4].payload, Payload::video("clip.mp4", 0));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "{\"origin\": \"self\", \"at\": 0, \"kind\": \"text\", \"text\": \"ok\"}\n\n{\"origin\": \"robot\"}";
        let err = parse_records(input).unwrap_err();
        match err {
            ReplayError::Parse { line, .. } => assert_eq!(line, 3),
            ReplayError::Io(e) => panic!("unexpected io error: {e}"),
        }
    }

    #[test]
    fn test_replay_groups_entries() {
        let timeline = replay(parse_records(LOG).unwrap(), GroupingPolicy::default());

        let separators: Vec<Timestamp> =
            timeline.iter().filter_map(ChatEntry::separator_time).collect();
        assert_eq!(separators, vec![0, 400_000]);
        assert_eq!(timeline.contents().count(), 5);
    }

    #[test]
    fn test_replay_out_of_order_records_are_clamped() {
        let records = vec![
            InboundRecord {
                origin: Origin::Peer,
                at: 50_000,
                payload: Payload::text("first"),
            },
            InboundRecord {
                origin: Origin::Local,
                at: 10_000,
                payload: Payload::text("late"),
            },
        ];
        let timeline = replay(records, GroupingPolicy::default());
        let stamps: Vec<Timestamp> = timeline.contents().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![50_000, 50_000]);
    }

    #[test]
    fn test_replay_applies_input_rules() {
        let input = r#"
{"origin": "self", "at": 0, "kind": "text", "text": "  "}
{"origin": "self", "at": 1000, "kind": "audio", "uri": "long.m4a", "duration_ms": 95000}
{"origin": "peer", "at": 2000, "kind": "file", "uri": "content://downloads/1"}
"#;
        let timeline = replay(parse_records(input).unwrap(), GroupingPolicy::default());

        let payloads: Vec<&Payload> = timeline.contents().map(|c| &c.payload).collect();
        assert_eq!(
            payloads,
            vec![
                &Payload::audio("long.m4a", 60_000),
                &Payload::file("unknown file", "content://downloads/1", 0, "*/*"),
            ]
        );
        assert_eq!(timeline.separator_count(), 1);
    }

    #[test]
    fn test_load_records_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("log.jsonl");
        std::fs::write(&path, LOG).unwrap();

        assert_eq!(load_records(&path).unwrap().len(), 5);
        assert!(matches!(
            load_records(&temp.path().join("missing.jsonl")),
            Err(ReplayError::Io(_))
        ));
    }
}
