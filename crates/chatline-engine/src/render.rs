//! Plain-text transcript rendering.
//!
//! Produces one line per entry: separators as `-- <label> --`, content as
//! `<speaker> <summary>`.

use chrono::{DateTime, TimeZone};

use crate::entry::ChatEntry;
use crate::format::{separator_label, LabelStyle};

/// Options for transcript rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Use ASCII speaker symbols.
    pub ascii: bool,
    /// Separator label wording.
    pub labels: LabelStyle,
}

/// Render a single entry relative to `now`.
pub fn render_entry<Tz>(entry: &ChatEntry, now: &DateTime<Tz>, options: &RenderOptions) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match entry {
        ChatEntry::Separator { timestamp } => {
            format!("-- {} --", separator_label(*timestamp, now, &options.labels))
        }
        ChatEntry::Content(content) => {
            let symbol = if options.ascii {
                content.origin.symbol_ascii()
            } else {
                content.origin.symbol()
            };
            format!("{symbol} {}", content.payload.summary())
        }
    }
}

/// Render all entries relative to `now`.
pub fn render_transcript<'a, Tz, I>(
    entries: I,
    now: &DateTime<Tz>,
    options: &RenderOptions,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    I: IntoIterator<Item = &'a ChatEntry>,
{
    entries
        .into_iter()
        .map(|entry| render_entry(entry, now, options))
        .collect()
}
