//! Conversation facade tying a timeline to a clock.
//!
//! Collaborators (input box, pickers, recorders, the network side) hand over
//! finished payloads here; a capture that failed never gets this far.
//!
//! Input rules applied before anything reaches the timeline:
//! - blank text is dropped
//! - voice clips are capped at [`MAX_VOICE_DURATION_MS`]

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::entry::{Content, Origin, Payload};
use crate::timeline::{AppendOutcome, GroupingPolicy, Timeline};

/// Longest voice clip kept, in milliseconds.
pub const MAX_VOICE_DURATION_MS: u64 = 60_000;

/// A single conversation.
#[derive(Debug)]
pub struct Conversation<C: Clock = SystemClock> {
    timeline: Timeline,
    clock: C,
}

impl Conversation<SystemClock> {
    /// Create a conversation stamped by the wall clock.
    pub fn new(policy: GroupingPolicy) -> Self {
        Self::with_clock(SystemClock, policy)
    }
}

impl<C: Clock> Conversation<C> {
    /// Create a conversation with an explicit clock.
    pub fn with_clock(clock: C, policy: GroupingPolicy) -> Self {
        Self {
            timeline: Timeline::with_policy(policy),
            clock,
        }
    }

    /// Record content from either party at the clock's current time.
    ///
    /// Returns `None` when the payload is blank text and nothing was appended.
    pub fn record(&mut self, origin: Origin, payload: Payload) -> Option<AppendOutcome> {
        let payload = match payload {
            Payload::Text { text } if text.trim().is_empty() => {
                debug!(origin = %origin, "Dropping blank text message");
                return None;
            }
            Payload::Audio { uri, duration_ms } => Payload::Audio {
                uri,
                duration_ms: duration_ms.min(MAX_VOICE_DURATION_MS),
            },
            other => other,
        };

        let now = self.clock.now_millis();
        Some(self.timeline.append(Content::new(origin, now, payload), now))
    }

    /// Record content sent from this device.
    pub fn send(&mut self, payload: Payload) -> Option<AppendOutcome> {
        self.record(Origin::Local, payload)
    }

    /// Record content received from the peer.
    pub fn receive(&mut self, payload: Payload) -> Option<AppendOutcome> {
        self.record(Origin::Peer, payload)
    }

    /// Get the timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Get the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Consume the conversation, keeping the timeline.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}
