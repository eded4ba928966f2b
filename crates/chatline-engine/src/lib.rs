//! chatline-engine: Conversation timeline engine for a single-screen chat client
//!
//! This crate provides the non-UI core of the chat screen, including:
//! - Chat entry model (text, image, voice, video, file, separators)
//! - Timeline building with time-separator grouping
//! - Separator labels and media/file display helpers
//! - An injectable voice playback controller
//! - Plain-text transcript rendering and JSON-lines replay

pub mod clock;
pub mod config;
pub mod conversation;
pub mod entry;
pub mod format;
pub mod playback;
pub mod render;
pub mod replay;
pub mod timeline;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use conversation::{Conversation, MAX_VOICE_DURATION_MS};
pub use entry::{ChatEntry, Content, ContentKind, Origin, Payload, Timestamp};
pub use format::{format_duration, format_file_size, separator_label, FileCategory, LabelStyle};
pub use playback::{BackendError, PlaybackBackend, PlaybackController, PlaybackError, PlaybackState};
pub use render::{render_entry, render_transcript, RenderOptions};
pub use replay::{load_records, parse_records, replay, InboundRecord, ReplayError};
pub use timeline::{append, AppendOutcome, GroupingPolicy, Timeline, DEFAULT_GROUPING_WINDOW_MS};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
