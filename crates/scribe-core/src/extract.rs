//! Requirement extraction
//!
//! Applies every category of the pattern library to every unit of a
//! transcript. Clustering and reduction of the resulting candidate stream
//! live in [`crate::reduce`].

use crate::metadata;
use crate::segment::{self, Unit};
use crate::types::{ActionItem, MeetingMetadata, UNSPECIFIED};
use scribe_patterns::{Captures, Category, PatternLibrary};
use serde::{Deserialize, Serialize};

/// One match of one pattern on one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Requirement category
    pub category: Category,
    /// Name of the matcher that fired
    pub pattern: String,
    /// Index of the source unit
    pub unit: usize,
    /// Speaker of the source unit
    pub speaker: Option<String>,
    /// Full text of the source unit
    pub text: String,
    /// Matched span and named groups
    pub captures: Captures,
}

impl Candidate {
    /// Named group value
    #[inline]
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&str> {
        self.captures.get(name)
    }
}

/// Output of [`extract`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    /// Supplied or inferred metadata
    pub metadata: MeetingMetadata,
    /// Number of units the transcript was split into
    pub unit_count: usize,
    /// Candidates in unit order, then category order
    pub candidates: Vec<Candidate>,
    /// Distinct epic names in mention order
    pub epic_names: Vec<String>,
    /// Action items in mention order
    pub action_items: Vec<ActionItem>,
}

impl Extraction {
    /// Whether any requirement content was found
    ///
    /// Priority language alone does not count as content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.candidates
            .iter()
            .any(|c| c.category != Category::PrioritySignal)
    }
}

/// Extract candidates, epic names and action items from transcript text
///
/// Never fails: text without recognisable content yields an empty
/// candidate list.
#[must_use]
pub fn extract(
    library: &PatternLibrary,
    text: &str,
    metadata: Option<&MeetingMetadata>,
) -> Extraction {
    let units = segment::segment(text);
    let metadata = metadata
        .cloned()
        .unwrap_or_else(|| metadata::infer(text, &segment::speakers(&units)));

    let mut extraction = Extraction {
        metadata,
        unit_count: units.len(),
        ..Extraction::default()
    };

    for unit in &units {
        for hit in library.match_all(&unit.text) {
            let candidate = Candidate {
                category: hit.category,
                pattern: hit.matcher.to_string(),
                unit: unit.index,
                speaker: unit.speaker.clone(),
                text: unit.text.clone(),
                captures: hit.captures,
            };
            if candidate.category == Category::EpicName {
                if let Some(name) = candidate.group("name").map(clean_epic_name) {
                    push_epic_name(&mut extraction.epic_names, name);
                }
            }
            extraction.candidates.push(candidate);
        }
        if let Some(item) = action_item(library, unit) {
            extraction.action_items.push(item);
        }
    }

    tracing::debug!(
        units = extraction.unit_count,
        candidates = extraction.candidates.len(),
        epics = extraction.epic_names.len(),
        action_items = extraction.action_items.len(),
        "extraction complete"
    );
    extraction
}

/// Canonical spelling of an epic name
#[must_use]
pub fn clean_epic_name(raw: &str) -> String {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let skip = usize::from(
        words
            .first()
            .is_some_and(|w| matches!(w.to_ascii_lowercase().as_str(), "the" | "a" | "an")),
    );
    words[skip.min(words.len())..]
        .join(" ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn push_epic_name(names: &mut Vec<String>, name: String) {
    if !name.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
        names.push(name);
    }
}

fn action_item(library: &PatternLibrary, unit: &Unit) -> Option<ActionItem> {
    let (_, caps) = library.first_action_item(&unit.text)?;

    if let Some(item) = caps.get("item") {
        // A labelled item may itself say who and when
        if let Some((_, inner)) = library.first_action_item(item) {
            if inner.has("task") {
                return Some(owned_item(&inner, unit));
            }
        }
        return Some(ActionItem::new(item));
    }
    caps.has("task").then(|| owned_item(&caps, unit))
}

fn owned_item(caps: &Captures, unit: &Unit) -> ActionItem {
    let owner = match caps.get("owner") {
        Some("I") => unit.speaker.clone(),
        Some(owner) => Some(owner.to_string()),
        None => None,
    };
    ActionItem {
        item: caps.get("task").unwrap_or_default().to_string(),
        owner: owner.unwrap_or_else(|| UNSPECIFIED.to_string()),
        due_date: caps.get("due").unwrap_or(UNSPECIFIED).to_string(),
    }
}
