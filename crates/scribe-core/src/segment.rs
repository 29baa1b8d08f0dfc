//! Transcript segmentation into sentence-level units
//!
//! Lines come first. A speaker marker (`Name (Role): text` or `Name: text`)
//! attributes the line and every following unmarked line to that speaker.
//! When the header lists attendees only their names count as markers;
//! otherwise a marker is one to three capitalised words followed by a
//! sentence rather than a lowercase value or a bare list.
//! Each line body is then split into sentences on `.`, `!` or `?` followed
//! by whitespace, except inside brackets, after known abbreviations and
//! between digits.

use crate::metadata;
use serde::{Deserialize, Serialize};

/// Words that end in a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "vs.", "dr.", "mr.", "mrs.", "ms.", "approx.", "no.", "min.", "max.",
];

/// Labels that look like speaker markers but introduce content
const RESERVED_LABELS: &[&str] = &[
    "action item",
    "action items",
    "agenda",
    "attendees",
    "column",
    "columns",
    "date",
    "decision",
    "decisions",
    "duration",
    "epic",
    "feature",
    "field",
    "fields",
    "filters",
    "follow up",
    "follow-up",
    "meeting",
    "module",
    "next steps",
    "note",
    "notes",
    "options",
    "participants",
    "priority",
    "requirements",
    "scope",
    "search",
    "section",
    "sections",
    "summary",
    "tab",
    "tabs",
    "task",
    "title",
    "to-do",
    "todo",
    "topics",
];

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// One sentence-level unit of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Position in the unit stream
    pub index: usize,
    /// Speaker the unit is attributed to
    pub speaker: Option<String>,
    /// Sentence text, trimmed, without trailing terminator
    pub text: String,
}

/// Split transcript text into units
///
/// Metadata header lines (`Date:`, `Attendees:`...) are skipped.
#[must_use]
pub fn segment(text: &str) -> Vec<Unit> {
    let attendees = metadata::header_attendees(text);
    let mut units = Vec::new();
    let mut speaker: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || metadata::header_field(line).is_some() {
            continue;
        }

        let line = strip_timestamp(line);
        let body = match split_speaker(line, &attendees) {
            Some((name, rest)) => {
                speaker = Some(name);
                rest
            }
            None => line,
        };

        for sentence in split_sentences(strip_bullet(body)) {
            units.push(Unit {
                index: units.len(),
                speaker: speaker.clone(),
                text: sentence,
            });
        }
    }

    units
}

/// Distinct speaker names, in order of first appearance
#[must_use]
pub fn speakers(units: &[Unit]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in units.iter().filter_map(|u| u.speaker.as_ref()) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// Split a `Name (Role): text` marker off a line
fn split_speaker<'a>(line: &'a str, attendees: &[String]) -> Option<(String, &'a str)> {
    let (head, rest) = line.split_once(':')?;
    let name = match head.find('(') {
        Some(open) => {
            // Role must be closed right before the colon
            let _role = head[open + 1..].trim_end().strip_suffix(')')?;
            head[..open].trim()
        }
        None => head.trim(),
    };
    let rest = rest.trim();
    if !is_speaker_name(name) {
        return None;
    }
    let speaks = if attendees.is_empty() {
        !reads_as_value(rest)
    } else {
        is_attendee(name, attendees)
    };
    speaks.then(|| (name.to_string(), rest))
}

fn is_speaker_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > 3 {
        return false;
    }
    let well_formed = words.iter().all(|w| {
        w.chars().next().is_some_and(char::is_uppercase)
            && w
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '.' | '\'' | '-'))
    });
    well_formed && !RESERVED_LABELS.contains(&name.to_lowercase().as_str())
}

/// Every word of the marker appears in one attendee's name
fn is_attendee(name: &str, attendees: &[String]) -> bool {
    let words: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    attendees.iter().any(|attendee| {
        let known: Vec<String> = attendee.split_whitespace().map(str::to_lowercase).collect();
        words.iter().all(|w| known.contains(w))
    })
}

/// `dropdown`, `two tabs` or `Active, History` after a label
fn reads_as_value(rest: &str) -> bool {
    if rest.chars().next().is_some_and(char::is_lowercase) {
        return true;
    }
    rest.contains(',')
        && !rest.contains(TERMINATORS)
        && !rest.contains(':')
        && rest.split(',').all(|item| item.split_whitespace().count() <= 3)
}

/// Drop a leading `[00:01:23]` style timestamp
fn strip_timestamp(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some((stamp, after)) = rest.split_once(']') {
            if stamp.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '.') {
                return after.trim_start();
            }
        }
    }
    line
}

/// Drop a leading list marker (`- `, `* `, `• `, `1. `, `1) `)
fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

/// Split one line body into sentences
fn split_sentences(body: &str) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    let mut sentences = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '.' | '!' | '?' if depth == 0 => {
                if chars.get(i + 1).is_some_and(|n| !n.is_whitespace()) {
                    continue;
                }
                if c == '.' && (ends_with_abbreviation(&chars[start..=i]) || between_digits(&chars, i)) {
                    continue;
                }
                push_sentence(&mut sentences, &chars[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_sentence(&mut sentences, &chars[start.min(chars.len())..]);
    sentences
}

fn push_sentence(out: &mut Vec<String>, chars: &[char]) {
    let text: String = chars.iter().collect();
    let text = text
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || TERMINATORS.contains(&c));
    if !text.is_empty() {
        out.push(text.to_string());
    }
}

fn ends_with_abbreviation(chars: &[char]) -> bool {
    let word: String = chars
        .iter()
        .rev()
        .take_while(|c| !c.is_whitespace())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let word = word
        .trim_start_matches(|c: char| matches!(c, '(' | '"' | '\'' | ','))
        .to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

fn between_digits(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|p| chars.get(p));
    let after = chars[i + 1..].iter().find(|c| !c.is_whitespace());
    before.is_some_and(char::is_ascii_digit) && after.is_some_and(char::is_ascii_digit)
}
