//! Ticket mapping
//!
//! Turns reduced epic requirements into ordered tickets. Structural tickets
//! come first in a fixed order: backend, RBAC, navigation, then a view and a
//! search ticket per tab. Ad hoc tickets follow in transcript order: add
//! forms, row actions, download, upload and deleted-data handling. Anything
//! that does not map becomes a clarification instead of a ticket.

use crate::config::ScribeConfig;
use crate::reduce::{Clarifications, EpicRequirements, Rule, Story, UNNAMED_EPIC};
use crate::templates::{self, TemplateContext};
use crate::types::{Epic, TicketDetails, TicketType};

/// What a user story asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Create a record
    Add,
    /// Act on existing records
    Act,
    /// Export records
    Download,
    /// Bulk import
    Upload,
    /// Look at records
    View,
    /// Find records
    Search,
}

const STOP_WORDS: &[&str] = &[
    "for", "to", "in", "into", "with", "from", "by", "on", "at", "so", "when", "that", "if",
    "and", "or", "under", "via", "using", "after", "before",
];

const SKIP_WORDS: &[&str] = &[
    "a", "an", "the", "new", "all", "any", "their", "existing", "multiple", "each",
];

/// Classify a story action by its leading verb
///
/// Returns the intent and the object phrase that follows the verb, e.g.
/// `add a new wound assessment for a patient` gives
/// `(Add, "wound assessment")`.
#[must_use]
pub fn classify(action: &str) -> Option<(Intent, String)> {
    let words: Vec<String> = action
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                .to_ascii_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    words.iter().take(4).enumerate().find_map(|(i, word)| {
        let intent = match word.as_str() {
            "add" | "create" | "enter" | "record" | "log" | "register" | "submit" | "document" => {
                Intent::Add
            }
            "edit" | "update" | "delete" | "discontinue" | "archive" | "approve" | "mark"
            | "cancel" | "modify" | "remove" | "sign" => Intent::Act,
            "download" | "export" | "print" => Intent::Download,
            "upload" | "import" | "bulk" => Intent::Upload,
            "view" | "see" | "browse" | "list" | "access" | "review" | "read" => Intent::View,
            "search" | "filter" | "find" => Intent::Search,
            _ => return None,
        };
        Some((intent, object_phrase(&words[i + 1..])))
    })
}

fn object_phrase(words: &[String]) -> String {
    words
        .iter()
        .skip_while(|w| SKIP_WORDS.contains(&w.as_str()))
        .take_while(|w| !STOP_WORDS.contains(&w.as_str()))
        .take(4)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `medications` -> `medication`, `entries` -> `entry`
fn singular(phrase: &str) -> String {
    let (head, last) = phrase.rsplit_once(' ').unwrap_or(("", phrase));
    let last = if let Some(stem) = last.strip_suffix("ies") {
        format!("{stem}y")
    } else if last.len() > 3 && last.ends_with('s') && !last.ends_with("ss") {
        last[..last.len() - 1].to_string()
    } else {
        last.to_string()
    };
    if head.is_empty() {
        last
    } else {
        format!("{head} {last}")
    }
}

#[derive(Debug)]
struct Draft {
    ticket_type: TicketType,
    details: TicketDetails,
}

impl Draft {
    fn new(ticket_type: TicketType) -> Self {
        Self {
            ticket_type,
            details: TicketDetails::default(),
        }
    }

    fn with_details(ticket_type: TicketType, details: TicketDetails) -> Self {
        Self {
            ticket_type,
            details,
        }
    }
}

enum Event<'a> {
    Story(&'a Story),
    Fields,
    Rule(&'a Rule),
}

/// Map one epic's requirements to an epic with ordered tickets
pub fn map_epic(
    req: &EpicRequirements,
    config: &ScribeConfig,
    clar: &mut Clarifications,
) -> Epic {
    let epic = req.name.as_str();
    let mut drafts = structural(req, config, clar);
    drafts.extend(ad_hoc(req, clar));

    if drafts.is_empty() {
        clar.raise(
            format!("'{epic}' has no requirements that map to tickets; what should be built?"),
            req.description.clone(),
        );
    }

    let ctx = TemplateContext {
        epic,
        scope: req.scope,
        nav_parent: &config.nav_parent,
    };
    let tickets: Vec<_> = drafts
        .into_iter()
        .map(|d| {
            let priority = req
                .priority
                .unwrap_or_else(|| config.priority_defaults.get(d.ticket_type));
            templates::render(d.ticket_type, d.details, priority, ctx)
        })
        .collect();

    tracing::debug!(epic, tickets = tickets.len(), "epic mapped");

    Epic {
        epic_name: req.name.clone(),
        epic_description: req.description.clone(),
        priority: req.priority.unwrap_or(config.default_epic_priority),
        scope: req.scope,
        tabs: req.tabs.clone(),
        tickets,
    }
}

fn structural(req: &EpicRequirements, config: &ScribeConfig, clar: &mut Clarifications) -> Vec<Draft> {
    let mut drafts = Vec::new();

    if req.backend.is_empty() {
        for note in &req.tech_notes {
            clar.raise(
                format!(
                    "'{}' mentions {} but no ticket type covers it; should it be tracked separately?",
                    req.name, note.subject
                ),
                note.context.clone(),
            );
        }
    } else {
        let mut notes = req.backend.clone();
        for note in &req.tech_notes {
            if !notes.contains(&note.context) {
                notes.push(note.context.clone());
            }
        }
        drafts.push(Draft::with_details(
            TicketType::BackendArchitecture,
            TicketDetails {
                notes,
                ..TicketDetails::default()
            },
        ));
    }

    if !req.rbac.is_empty() {
        drafts.push(Draft::with_details(
            TicketType::RbacPermissions,
            TicketDetails {
                rbac: req.rbac.clone(),
                ..TicketDetails::default()
            },
        ));
    }

    if let Some(nav) = &req.nav {
        drafts.push(Draft::with_details(
            TicketType::NavMenu,
            TicketDetails {
                nav_parent: Some(nav.parent.clone().unwrap_or_else(|| config.nav_parent.clone())),
                ..TicketDetails::default()
            },
        ));
    }

    let search = (!req.search.is_empty()).then(|| req.search.clone());
    for tab in &req.tabs {
        let columns = req
            .tab_columns
            .get(tab)
            .cloned()
            .unwrap_or_else(|| req.columns.clone());
        drafts.push(Draft::with_details(
            TicketType::ViewTableData,
            TicketDetails {
                tab_name: Some(tab.clone()),
                columns,
                ..TicketDetails::default()
            },
        ));
        drafts.push(Draft::with_details(
            TicketType::SearchFilter,
            TicketDetails {
                tab_name: Some(tab.clone()),
                search: search.clone(),
                ..TicketDetails::default()
            },
        ));
    }

    drafts
}

fn ad_hoc(req: &EpicRequirements, clar: &mut Clarifications) -> Vec<Draft> {
    let epic = req.name.as_str();
    let default_entity = if epic == UNNAMED_EPIC {
        "record".to_string()
    } else {
        epic.to_ascii_lowercase()
    };
    let has_add_story = req
        .stories
        .iter()
        .any(|s| matches!(classify(&s.action), Some((Intent::Add, _))));
    let has_view = !req.tabs.is_empty();

    let mut events: Vec<(usize, Event<'_>)> = req.stories.iter().map(|s| (s.unit, Event::Story(s))).collect();
    if !has_add_story && !req.fields.is_empty() {
        events.push((req.fields_at.unwrap_or(0), Event::Fields));
    }
    events.extend(req.rules.iter().map(|r| (r.unit, Event::Rule(r))));
    events.sort_by_key(|(unit, _)| *unit);

    let mut drafts: Vec<Draft> = Vec::new();
    let mut pending_rules: Vec<&Rule> = Vec::new();

    for (_, event) in events {
        match event {
            Event::Story(story) => match classify(&story.action) {
                Some((Intent::Add, object)) => {
                    let entity = if object.is_empty() {
                        default_entity.clone()
                    } else {
                        singular(&object)
                    };
                    if find(&drafts, TicketType::AddEntity, Some(&entity)).is_none() {
                        drafts.push(Draft::with_details(
                            TicketType::AddEntity,
                            TicketDetails {
                                entity_name: Some(entity),
                                ..TicketDetails::default()
                            },
                        ));
                    }
                }
                Some((Intent::Act, object)) => {
                    let entity = if object.is_empty() {
                        "records".to_string()
                    } else {
                        object
                    };
                    if find(&drafts, TicketType::PerformActions, Some(&entity)).is_none() {
                        let lower = story.context.to_ascii_lowercase();
                        let tab = req
                            .tabs
                            .iter()
                            .find(|t| lower.contains(&t.to_ascii_lowercase()))
                            .cloned();
                        drafts.push(Draft::with_details(
                            TicketType::PerformActions,
                            TicketDetails {
                                entity_name: Some(entity),
                                tab_name: tab,
                                ..TicketDetails::default()
                            },
                        ));
                    }
                }
                Some((intent @ (Intent::Download | Intent::Upload), _)) => {
                    let ticket_type = if intent == Intent::Download {
                        TicketType::Download
                    } else {
                        TicketType::UploadCsv
                    };
                    if find(&drafts, ticket_type, None).is_none() {
                        drafts.push(Draft::new(ticket_type));
                    }
                }
                Some((Intent::View | Intent::Search, _)) => {
                    if !has_view {
                        clar.raise(
                            format!("'{epic}' asks that users {} but no tabs were named; what should be shown?", story.action),
                            story.context.clone(),
                        );
                    }
                }
                None => {
                    clar.raise(
                        format!("Could not map \"{} {}\" in '{epic}' to a ticket type; what should be built?", story.actor, story.action),
                        story.context.clone(),
                    );
                }
            },
            Event::Fields => {
                if find(&drafts, TicketType::AddEntity, None).is_none() {
                    drafts.push(Draft::with_details(
                        TicketType::AddEntity,
                        TicketDetails {
                            entity_name: Some(default_entity.clone()),
                            ..TicketDetails::default()
                        },
                    ));
                }
            }
            Event::Rule(rule) if rule.is_edge_case() => {
                match drafts.iter_mut().find(|d| d.ticket_type == TicketType::EdgeCases) {
                    Some(draft) => draft.details.rules.push(rule.context.clone()),
                    None => drafts.push(Draft::with_details(
                        TicketType::EdgeCases,
                        TicketDetails {
                            rules: vec![rule.context.clone()],
                            ..TicketDetails::default()
                        },
                    )),
                }
            }
            Event::Rule(rule) => pending_rules.push(rule),
        }
    }

    if let Some(i) = find(&drafts, TicketType::AddEntity, None) {
        drafts[i].details.fields = req.fields.clone();
    }

    let target = find(&drafts, TicketType::AddEntity, None)
        .or_else(|| find(&drafts, TicketType::PerformActions, None));
    match target {
        Some(i) => {
            drafts[i]
                .details
                .rules
                .extend(pending_rules.iter().map(|r| r.context.clone()));
        }
        None => {
            for rule in pending_rules {
                clar.raise(
                    format!("Rule \"{}\" in '{epic}' has no add or edit ticket to attach to; where does it apply?", rule.text),
                    rule.context.clone(),
                );
            }
        }
    }

    drafts
}

fn find(drafts: &[Draft], ticket_type: TicketType, entity: Option<&str>) -> Option<usize> {
    drafts.iter().position(|d| {
        d.ticket_type == ticket_type
            && entity.map_or(true, |e| {
                d.details
                    .entity_name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(e))
            })
    })
}
