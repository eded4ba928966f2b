//! Display helpers for separators, durations and file attachments.

use chrono::{DateTime, Datelike, TimeZone};

use crate::entry::Timestamp;

/// Default label prefix for timestamps on the previous calendar day.
pub const DEFAULT_YESTERDAY_LABEL: &str = "Yesterday";

/// Wording used when formatting separator labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    /// Prefix for timestamps that fall on the day before `now`.
    pub yesterday: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            yesterday: DEFAULT_YESTERDAY_LABEL.into(),
        }
    }
}

/// Format a separator timestamp relative to `now`.
///
/// - same calendar day: `HH:MM`
/// - previous calendar day: `Yesterday HH:MM`
/// - same calendar year: `MM-DD HH:MM`
/// - otherwise: `YYYY-MM-DD HH:MM`
///
/// Calendar days are taken in the time zone of `now`.
pub fn separator_label<Tz>(timestamp: Timestamp, now: &DateTime<Tz>, style: &LabelStyle) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(utc) = DateTime::from_timestamp_millis(timestamp) else {
        return timestamp.to_string();
    };
    let at = utc.with_timezone(&now.timezone());

    let day = at.date_naive();
    let today = now.date_naive();

    if day == today {
        at.format("%H:%M").to_string()
    } else if today.pred_opt() == Some(day) {
        format!("{} {}", style.yesterday, at.format("%H:%M"))
    } else if at.year() == now.year() {
        at.format("%m-%d %H:%M").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Format a playback length as `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_duration(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Format a byte count with one decimal place in base-1024 units.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if size == 0 {
        return "0 B".into();
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}

/// Broad category of a file attachment, used to pick an icon or tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Text,
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Other,
}

impl FileCategory {
    /// Classify a MIME type by prefix.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| mime.starts_with(p));

        if starts(&["image/"]) {
            Self::Image
        } else if starts(&["video/"]) {
            Self::Video
        } else if starts(&["audio/"]) {
            Self::Audio
        } else if starts(&["text/"]) {
            Self::Text
        } else if starts(&["application/pdf"]) {
            Self::Pdf
        } else if starts(&[
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml",
        ]) {
            Self::Document
        } else if starts(&[
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml",
        ]) {
            Self::Spreadsheet
        } else if starts(&[
            "application/vnd.ms-powerpoint",
            "application/vnd.openxmlformats-officedocument.presentationml",
        ]) {
            Self::Presentation
        } else {
            Self::Other
        }
    }

    /// Short tag for transcript display.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Document => "doc",
            Self::Spreadsheet => "sheet",
            Self::Presentation => "slides",
            Self::Other => "file",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc_now(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn millis(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap().timestamp_millis()
    }

    #[test]
    fn test_label_same_day() {
        let now = utc_now("2024-05-10T18:00:00Z");
        let label = separator_label(millis("2024-05-10T09:05:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "09:05");
    }

    #[test]
    fn test_label_yesterday() {
        let now = utc_now("2024-05-10T00:10:00Z");
        let label = separator_label(millis("2024-05-09T23:50:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "Yesterday 23:50");
    }

    #[test]
    fn test_label_custom_yesterday_wording() {
        let now = utc_now("2024-05-10T12:00:00Z");
        let style = LabelStyle {
            yesterday: "\u{6628}".into(),
        };
        let label = separator_label(millis("2024-05-09T08:00:00Z"), &now, &style);
        assert_eq!(label, "\u{6628} 08:00");
    }

    #[test]
    fn test_label_same_year() {
        let now = utc_now("2024-05-10T12:00:00Z");
        let label = separator_label(millis("2024-01-02T03:04:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "01-02 03:04");
    }

    #[test]
    fn test_label_other_year() {
        let now = utc_now("2024-01-01T12:00:00Z");
        let label = separator_label(millis("2023-12-30T21:15:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "2023-12-30 21:15");
    }

    #[test]
    fn test_label_year_boundary_yesterday() {
        let now = utc_now("2024-01-01T08:00:00Z");
        let label = separator_label(millis("2023-12-31T22:00:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "Yesterday 22:00");
    }

    #[test]
    fn test_label_uses_now_timezone() {
        // 23:30 UTC is already the next day at UTC+8.
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = utc_now("2024-05-10T02:00:00Z").with_timezone(&tz);
        let label = separator_label(millis("2024-05-09T23:30:00Z"), &now, &LabelStyle::default());
        assert_eq!(label, "07:30");
    }

    #[test]
    fn test_label_out_of_range() {
        let now = utc_now("2024-05-10T12:00:00Z");
        assert_eq!(
            separator_label(i64::MAX, &now, &LabelStyle::default()),
            i64::MAX.to_string()
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(5_999), "00:05");
        assert_eq!(format_duration(125_000), "02:05");
        assert_eq!(format_duration(3_600_000), "1:00:00");
        assert_eq!(format_duration(36_061_000), "10:01:01");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_file_category() {
        assert_eq!(FileCategory::from_mime("image/png"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("video/mp4"), FileCategory::Video);
        assert_eq!(FileCategory::from_mime("audio/mpeg"), FileCategory::Audio);
        assert_eq!(FileCategory::from_mime("text/plain"), FileCategory::Text);
        assert_eq!(FileCategory::from_mime("application/pdf"), FileCategory::Pdf);
        assert_eq!(
            FileCategory::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            FileCategory::Document
        );
        assert_eq!(
            FileCategory::from_mime("application/vnd.ms-excel"),
            FileCategory::Spreadsheet
        );
        assert_eq!(
            FileCategory::from_mime("application/vnd.ms-powerpoint"),
            FileCategory::Presentation
        );
        assert_eq!(FileCategory::from_mime("application/zip"), FileCategory::Other);
    }
}
