//! Chat entry types.
//!
//! Entries represent everything shown in a conversation:
//! - Content entries: text, image, voice, video and file messages
//! - Separator entries: synthetic time markers inserted by the timeline

use serde::{Deserialize, Serialize};

use crate::format::{format_duration, format_file_size, FileCategory};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Who produced a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Sent from this device.
    #[serde(rename = "self")]
    Local,
    /// Received from the other party.
    #[serde(rename = "peer")]
    Peer,
}

impl Origin {
    /// Speaker symbol for compact display.
    ///
    /// Returns `›` for local messages and `‹` for peer messages.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Local => "\u{203a}", // ›
            Self::Peer => "\u{2039}",  // ‹
        }
    }

    /// Speaker symbol for ASCII mode.
    pub fn symbol_ascii(self) -> &'static str {
        match self {
            Self::Local => ">",
            Self::Peer => "<",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "self"),
            Self::Peer => write!(f, "peer"),
        }
    }
}

/// Content type, derived from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
    Audio,
    Video,
    File,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Kind-specific message data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Plain text message.
    Text { text: String },
    /// Image attachment.
    Image { uri: String },
    /// Voice recording.
    Audio { uri: String, duration_ms: u64 },
    /// Video clip with an optional thumbnail.
    Video {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail_uri: Option<String>,
        #[serde(default)]
        duration_ms: u64,
    },
    /// Arbitrary file attachment.
    File {
        #[serde(default = "default_file_name")]
        name: String,
        uri: String,
        #[serde(default)]
        size: u64,
        #[serde(default = "default_mime_type")]
        mime_type: String,
    },
}

/// Name shown when a picked file has no display name.
pub const DEFAULT_FILE_NAME: &str = "unknown file";

/// MIME type used when the provider reports none.
pub const DEFAULT_MIME_TYPE: &str = "*/*";

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.into()
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.into()
}

impl Payload {
    /// Create a text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image payload.
    pub fn image(uri: impl Into<String>) -> Self {
        Self::Image { uri: uri.into() }
    }

    /// Create a voice payload.
    pub fn audio(uri: impl Into<String>, duration_ms: u64) -> Self {
        Self::Audio {
            uri: uri.into(),
            duration_ms,
        }
    }

    /// Create a video payload without a thumbnail.
    pub fn video(uri: impl Into<String>, duration_ms: u64) -> Self {
        Self::Video {
            uri: uri.into(),
            thumbnail_uri: None,
            duration_ms,
        }
    }

    /// Create a file payload.
    pub fn file(
        name: impl Into<String>,
        uri: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self::File {
            name: name.into(),
            uri: uri.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// The content kind of this payload.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Image { .. } => ContentKind::Image,
            Self::Audio { .. } => ContentKind::Audio,
            Self::Video { .. } => ContentKind::Video,
            Self::File { .. } => ContentKind::File,
        }
    }

    /// Media reference, if the payload points at one.
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::Image { uri }
            | Self::Audio { uri, .. }
            | Self::Video { uri, .. }
            | Self::File { uri, .. } => Some(uri),
        }
    }

    /// Playback length for voice and video payloads.
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Audio { duration_ms, .. } | Self::Video { duration_ms, .. } => Some(*duration_ms),
            _ => None,
        }
    }

    /// One-line description for transcript display.
    pub fn summary(&self) -> String {
        match self {
            Self::Text { text } => first_line(text),
            Self::Image { uri } => format!("[image] {uri}"),
            Self::Audio { duration_ms, .. } => format!("[voice {}]", format_duration(*duration_ms)),
            Self::Video {
                uri, duration_ms, ..
            } => format!("[video {}] {uri}", format_duration(*duration_ms)),
            Self::File {
                name,
                size,
                mime_type,
                ..
            } => format!(
                "[{}] {name} ({})",
                FileCategory::from_mime(mime_type),
                format_file_size(*size)
            ),
        }
    }
}

/// A message sent or received in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Sequential id assigned by the timeline (0 until appended).
    #[serde(default)]
    pub id: u64,
    /// Local or peer.
    pub origin: Origin,
    /// Creation time.
    pub timestamp: Timestamp,
    /// Kind-specific data.
    #[serde(flatten)]
    pub payload: Payload,
}

impl Content {
    /// Create a content entry. The id is assigned on append.
    pub fn new(origin: Origin, timestamp: Timestamp, payload: Payload) -> Self {
        Self {
            id: 0,
            origin,
            timestamp,
            payload,
        }
    }

    /// Create a local text message.
    pub fn local_text(timestamp: Timestamp, text: impl Into<String>) -> Self {
        Self::new(Origin::Local, timestamp, Payload::text(text))
    }

    /// Create a peer text message.
    pub fn peer_text(timestamp: Timestamp, text: impl Into<String>) -> Self {
        Self::new(Origin::Peer, timestamp, Payload::text(text))
    }

    /// Content kind.
    pub fn kind(&self) -> ContentKind {
        self.payload.kind()
    }
}

/// One item in the conversation timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEntry {
    /// A message from either party.
    Content(Content),
    /// Synthetic time marker.
    Separator { timestamp: Timestamp },
}

impl ChatEntry {
    /// Timestamp of the entry.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Content(content) => content.timestamp,
            Self::Separator { timestamp } => *timestamp,
        }
    }

    /// Check if this entry is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator { .. })
    }

    /// Separator timestamp, or `None` for content.
    pub fn separator_time(&self) -> Option<Timestamp> {
        match self {
            Self::Separator { timestamp } => Some(*timestamp),
            Self::Content(_) => None,
        }
    }

    /// Borrow the content, if this is a content entry.
    pub fn as_content(&self) -> Option<&Content> {
        match self {
            Self::Content(content) => Some(content),
            Self::Separator { .. } => None,
        }
    }

    /// One-line description (empty for separators).
    pub fn summary(&self) -> String {
        match self {
            Self::Content(content) => content.payload.summary(),
            Self::Separator { .. } => String::new(),
        }
    }
}

/// Get the first line of a string.
fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_kind() {
        assert_eq!(Payload::text("hi").kind(), ContentKind::Text);
        assert_eq!(Payload::image("content://1").kind(), ContentKind::Image);
        assert_eq!(Payload::audio("a.m4a", 1000).kind(), ContentKind::Audio);
        assert_eq!(Payload::video("v.mp4", 0).kind(), ContentKind::Video);
        assert_eq!(
            Payload::file("a.pdf", "content://a", 10, "application/pdf").kind(),
            ContentKind::File
        );
    }

    #[test]
    fn test_text_summary_first_line() {
        let content = Content::local_text(0, "Line 1\nLine 2");
        assert_eq!(ChatEntry::Content(content).summary(), "Line 1");
    }

    #[test]
    fn test_media_summaries() {
        assert_eq!(Payload::audio("a.m4a", 65_000).summary(), "[voice 01:05]");
        assert_eq!(
            Payload::video("v.mp4", 3_725_000).summary(),
            "[video 1:02:05] v.mp4"
        );
        assert_eq!(
            Payload::file("report.pdf", "content://r", 1536, "application/pdf").summary(),
            "[pdf] report.pdf (1.5 KB)"
        );
    }

    #[test]
    fn test_uri_and_duration() {
        assert_eq!(Payload::text("x").uri(), None);
        assert_eq!(Payload::image("img").uri(), Some("img"));
        assert_eq!(Payload::audio("a", 5).duration_ms(), Some(5));
        assert_eq!(Payload::image("img").duration_ms(), None);
    }

    #[test]
    fn test_separator_accessors() {
        let sep = ChatEntry::Separator { timestamp: 42 };
        assert!(sep.is_separator());
        assert_eq!(sep.separator_time(), Some(42));
        assert_eq!(sep.timestamp(), 42);
        assert!(sep.as_content().is_none());

        let msg = ChatEntry::Content(Content::peer_text(7, "yo"));
        assert!(!msg.is_separator());
        assert_eq!(msg.separator_time(), None);
        assert_eq!(msg.timestamp(), 7);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = ChatEntry::Content(Content::new(
            Origin::Peer,
            1000,
            Payload::audio("voice.m4a", 4000),
        ));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "content");
        assert_eq!(json["kind"], "audio");
        assert_eq!(json["origin"], "peer");
        assert_eq!(json["duration_ms"], 4000);

        let parsed: ChatEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_file_payload_defaults() {
        let payload: Payload =
            serde_json::from_str(r#"{"kind": "file", "uri": "content://downloads/9"}"#).unwrap();
        assert_eq!(
            payload,
            Payload::file(DEFAULT_FILE_NAME, "content://downloads/9", 0, DEFAULT_MIME_TYPE)
        );
        assert_eq!(payload.summary(), "[file] unknown file (0 B)");
    }

    #[test]
    fn test_separator_serialization() {
        let json = serde_json::to_string(&ChatEntry::Separator { timestamp: 5 }).unwrap();
        assert_eq!(json, r#"{"type":"separator","timestamp":5}"#);
    }

    #[test]
    fn test_origin_symbols() {
        assert_eq!(Origin::Local.symbol_ascii(), ">");
        assert_eq!(Origin::Peer.symbol_ascii(), "<");
        assert_eq!(Origin::Local.to_string(), "self");
    }
}
