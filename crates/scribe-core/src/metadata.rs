//! Meeting metadata inference from header lines

use crate::types::{MeetingMetadata, UNKNOWN};
use chrono::NaiveDate;

/// Recognised header keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderKey {
    Date,
    Meeting,
    Attendees,
    Duration,
    Topics,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a `Key: value` header line
pub(crate) fn header_field(line: &str) -> Option<(HeaderKey, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = match key.trim().to_ascii_lowercase().as_str() {
        "date" | "meeting date" => HeaderKey::Date,
        "meeting" => HeaderKey::Meeting,
        "attendees" | "participants" => HeaderKey::Attendees,
        "duration" => HeaderKey::Duration,
        "topics" | "agenda" => HeaderKey::Topics,
        _ => return None,
    };
    Some((key, value.trim()))
}

/// Infer metadata from header lines
///
/// The first occurrence of each key wins. Attendees fall back to the speaker
/// names seen in the transcript. A missing date is `Unknown`, never today.
#[must_use]
pub fn infer(text: &str, speakers: &[String]) -> MeetingMetadata {
    let mut metadata = MeetingMetadata::default();
    let (mut date, mut duration) = (None, None);

    for (key, value) in text.lines().filter_map(|l| header_field(l.trim())) {
        match key {
            HeaderKey::Date if date.is_none() && !value.is_empty() => {
                date = Some(normalize_date(value));
            }
            HeaderKey::Meeting => match parse_date(value) {
                Some(iso) if date.is_none() => date = Some(iso),
                Some(_) => {}
                None => metadata.topics.extend(split_list(value)),
            },
            HeaderKey::Duration if duration.is_none() && !value.is_empty() => {
                duration = Some(value.to_string());
            }
            HeaderKey::Topics => metadata.topics.extend(split_list(value)),
            _ => {}
        }
    }

    if let Some(date) = date {
        metadata.date = date;
    }
    if let Some(duration) = duration {
        metadata.duration = duration;
    }
    metadata.attendees = header_attendees(text);
    if metadata.attendees.is_empty() {
        metadata.attendees = speakers.to_vec();
    }
    metadata
}

/// Names on the first non-empty attendee header line
pub(crate) fn header_attendees(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|l| header_field(l.trim()))
        .filter(|(key, _)| *key == HeaderKey::Attendees)
        .map(|(_, value)| split_list(value))
        .find(|names| !names.is_empty())
        .unwrap_or_default()
}

/// Normalize a date to ISO form, keeping unrecognised text verbatim
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }
    parse_date(raw).unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_normalized() {
        assert_eq!(normalize_date("2024-03-05"), "2024-03-05");
        assert_eq!(normalize_date("3/5/2024"), "2024-03-05");
        assert_eq!(normalize_date("March 5, 2024"), "2024-03-05");
        assert_eq!(normalize_date("next Tuesday"), "next Tuesday");
        assert_eq!(normalize_date(""), "Unknown");
    }

    #[test]
    fn headers_fill_metadata() {
        let text = "Date: 3/5/2024\nAttendees: Sarah; Dr. Lee\nDuration: 30 min\nAgenda: Med log, RBAC\n";
        let md = infer(text, &[]);
        assert_eq!(md.date, "2024-03-05");
        assert_eq!(md.attendees, vec!["Sarah", "Dr. Lee"]);
        assert_eq!(md.duration, "30 min");
        assert_eq!(md.topics, vec!["Med log", "RBAC"]);
    }

    #[test]
    fn meeting_title_becomes_topic() {
        let md = infer("Meeting: Medication Log sync", &[]);
        assert_eq!(md.topics, vec!["Medication Log sync"]);
        assert_eq!(md.date, "Unknown");
    }

    #[test]
    fn attendees_fall_back_to_speakers() {
        let md = infer("Sarah: hi", &["Sarah".to_string()]);
        assert_eq!(md.attendees, vec!["Sarah"]);
        assert_eq!(md.date, "Unknown");
        assert_eq!(md.duration, "Unknown");
    }

    #[test]
    fn non_header_lines_ignored() {
        assert!(header_field("Sarah: hello").is_none());
        assert!(header_field("no colon here").is_none());
        assert_eq!(header_field(" Participants : A, B").map(|(k, _)| k), Some(HeaderKey::Attendees));
    }
}
