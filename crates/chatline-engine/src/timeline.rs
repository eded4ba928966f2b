//! Conversation timeline and separator grouping.
//!
//! The timeline is an append-only, chronologically ordered list of
//! [`ChatEntry`] values. Every append decides whether a [`ChatEntry::Separator`]
//! has to be placed before the new content:
//!
//! - the first message always gets a leading separator
//! - a separator is never placed directly after another separator
//! - while no separator exists, the window is measured from the last message
//! - once one exists, the window is measured from the most recent separator
//!
//! Anchoring on the separator rather than the last message means a burst of
//! messages after a gap gets exactly one separator.

use serde::Serialize;
use tracing::{debug, warn};

use crate::entry::{ChatEntry, Content, Timestamp};

/// Default grouping window: 3 minutes.
pub const DEFAULT_GROUPING_WINDOW_MS: i64 = 3 * 60 * 1000;

/// Rule deciding when a separator is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingPolicy {
    /// Minimum elapsed time before a new separator, in milliseconds.
    pub window_millis: i64,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self {
            window_millis: DEFAULT_GROUPING_WINDOW_MS,
        }
    }
}

impl GroupingPolicy {
    /// Create a policy with a window given in seconds.
    pub fn from_seconds(seconds: u64) -> Self {
        let window_millis = i64::try_from(seconds)
            .ok()
            .and_then(|s| s.checked_mul(1000))
            .unwrap_or(i64::MAX);
        Self { window_millis }
    }

    /// Whether content arriving at `now` needs a separator in front of it.
    pub fn needs_separator(&self, entries: &[ChatEntry], now: Timestamp) -> bool {
        let Some(last) = entries.last() else {
            return true;
        };

        if last.is_separator() {
            return false;
        }

        let anchor = entries
            .iter()
            .rev()
            .find_map(ChatEntry::separator_time)
            .unwrap_or_else(|| last.timestamp());

        now.saturating_sub(anchor) >= self.window_millis
    }
}

/// What a single append did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Id assigned to the appended content.
    pub id: u64,
    /// Whether a separator was placed before the content.
    pub separator_inserted: bool,
    /// Whether `now` was earlier than the last entry and got clamped.
    pub clamped: bool,
    /// Timestamp actually used for the content (and separator).
    pub timestamp: Timestamp,
}

/// Ordered conversation entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    /// All entries in chronological order.
    entries: Vec<ChatEntry>,
    /// Grouping rule applied on append.
    #[serde(skip)]
    policy: GroupingPolicy,
    /// Next content id to assign.
    #[serde(skip)]
    next_id: u64,
}

impl Timeline {
    /// Create an empty timeline with the default policy.
    pub fn new() -> Self {
        Self::with_policy(GroupingPolicy::default())
    }

    /// Create an empty timeline with a custom policy.
    pub fn with_policy(policy: GroupingPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
            next_id: 1,
        }
    }

    /// Get all entries.
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Iterate over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChatEntry> {
        self.entries.iter()
    }

    /// Get the grouping policy.
    pub fn policy(&self) -> GroupingPolicy {
        self.policy
    }

    /// Get the number of entries, separators included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the last entry.
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }

    /// Timestamp of the last entry.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.entries.last().map(ChatEntry::timestamp)
    }

    /// Timestamp of the most recent separator.
    pub fn last_separator_time(&self) -> Option<Timestamp> {
        self.entries.iter().rev().find_map(ChatEntry::separator_time)
    }

    /// Iterate over content entries only.
    pub fn contents(&self) -> impl Iterator<Item = &Content> {
        self.entries.iter().filter_map(ChatEntry::as_content)
    }

    /// Number of separators.
    pub fn separator_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_separator()).count()
    }

    /// Find content by id.
    pub fn get(&self, id: u64) -> Option<&Content> {
        self.contents().find(|c| c.id == id)
    }

    /// Append content received or sent at `now`.
    ///
    /// The content is restamped with `now`. A `now` earlier than the last
    /// entry is clamped to the last entry's timestamp.
    pub fn append(&mut self, mut content: Content, now: Timestamp) -> AppendOutcome {
        let mut clamped = false;
        let now = match self.last_timestamp() {
            Some(last) if now < last => {
                warn!(now, last, "Clock went backwards, clamping entry timestamp");
                clamped = true;
                last
            }
            _ => now,
        };

        let separator_inserted = self.policy.needs_separator(&self.entries, now);
        if separator_inserted {
            self.entries.push(ChatEntry::Separator { timestamp: now });
        }

        let id = self.next_id.max(1);
        self.next_id = id + 1;

        content.id = id;
        content.timestamp = now;
        debug!(
            id,
            kind = %content.kind(),
            origin = %content.origin,
            timestamp = now,
            separator_inserted,
            "Appended entry"
        );
        self.entries.push(ChatEntry::Content(content));

        AppendOutcome {
            id,
            separator_inserted,
            clamped,
            timestamp: now,
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a ChatEntry;
    type IntoIter = std::slice::Iter<'a, ChatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Consuming form of [`Timeline::append`].
pub fn append(mut timeline: Timeline, content: Content, now: Timestamp) -> Timeline {
    timeline.append(content, now);
    timeline
}
