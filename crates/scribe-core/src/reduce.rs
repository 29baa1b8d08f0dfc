//! Clustering and reduction of the candidate stream
//!
//! Candidates are grouped into epics by epic-name mentions, then each group
//! is folded into an [`EpicRequirements`] value. The fold is pure: every
//! ambiguity it meets is recorded on the draft and turned into clarifications
//! only when the draft is finalized.

use crate::config::ScribeConfig;
use crate::extract::{clean_epic_name, Candidate, Extraction};
use crate::types::{Clarification, ColumnSpec, FieldSpec, FieldType, Priority, RbacMap, Scope, SearchSpec};
use indexmap::IndexMap;
use scribe_patterns::Category;
use std::collections::HashSet;

/// Name of the epic used when the transcript names none
pub const UNNAMED_EPIC: &str = "Unnamed Feature";

/// Role words, singular
const ROLE_WORDS: &[&str] = &[
    "nurse",
    "doctor",
    "physician",
    "clinician",
    "admin",
    "administrator",
    "staff",
    "manager",
    "pharmacist",
    "caregiver",
    "supervisor",
    "therapist",
];

/// Ordered clarification list without duplicate questions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clarifications {
    items: Vec<Clarification>,
}

impl Clarifications {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a question; repeated questions are dropped
    ///
    /// Questions about one epic name the epic, so two epics never share one.
    pub fn raise(&mut self, question: impl Into<String>, context: impl Into<String>) {
        let clarification = Clarification::new(question, context);
        if !self.items.iter().any(|c| c.question == clarification.question) {
            tracing::debug!(question = %clarification.question, "clarification raised");
            self.items.push(clarification);
        }
    }

    /// Number of clarifications
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether none were raised
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raised clarifications, in order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Clarification] {
        &self.items
    }

    /// Take the list
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<Clarification> {
        self.items
    }
}

/// Candidates belonging to one epic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Epic name
    pub name: String,
    /// Candidates in transcript order
    pub candidates: Vec<Candidate>,
}

/// A user story as spoken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// Who acts
    pub actor: String,
    /// What they do
    pub action: String,
    /// Why, when stated
    pub outcome: Option<String>,
    /// Source unit
    pub unit: usize,
    /// Source sentence
    pub context: String,
}

/// A business or validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Rule text
    pub text: String,
    /// Field the rule makes conditional, if any
    pub field: Option<String>,
    /// Condition, if any
    pub condition: Option<String>,
    /// Source unit
    pub unit: usize,
    /// Source sentence
    pub context: String,
}

impl Rule {
    /// Whether the rule concerns deleted or archived data
    #[must_use]
    pub fn is_edge_case(&self) -> bool {
        let text = self.context.to_ascii_lowercase();
        ["deleted", "archived", "discontinued", "inactive", "expired"]
            .iter()
            .any(|w| text.contains(w))
    }
}

/// A navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    /// Parent menu, when stated
    pub parent: Option<String>,
    /// Source sentence
    pub context: String,
}

/// A technical note without its own ticket type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechNote {
    /// Subject, e.g. `audit log`
    pub subject: String,
    /// Source sentence
    pub context: String,
}

/// Reduced requirements of one epic, ready for ticket mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicRequirements {
    /// Epic name
    pub name: String,
    /// Description
    pub description: String,
    /// Epic-scoped priority signal, strongest wins
    pub priority: Option<Priority>,
    /// Scope
    pub scope: Scope,
    /// Tabs in mention order
    pub tabs: Vec<String>,
    /// Columns not tied to a tab
    pub columns: Vec<ColumnSpec>,
    /// Columns stated for one tab
    pub tab_columns: IndexMap<String, Vec<ColumnSpec>>,
    /// Merged form fields
    pub fields: Vec<FieldSpec>,
    /// Unit of the first field mention
    pub fields_at: Option<usize>,
    /// User stories
    pub stories: Vec<Story>,
    /// Role permissions
    pub rbac: RbacMap,
    /// Navigation request
    pub nav: Option<NavRequest>,
    /// Search and filter spec
    pub search: SearchSpec,
    /// Business rules
    pub rules: Vec<Rule>,
    /// Sentences asking for backend work
    pub backend: Vec<String>,
    /// Other technical notes
    pub tech_notes: Vec<TechNote>,
}

/// Group candidates into epic clusters
///
/// Candidates between one epic-name mention and the next belong to that
/// epic; candidates before the first mention belong to the first epic; a
/// repeated name reopens its cluster. Without any name a single
/// [`UNNAMED_EPIC`] cluster holds everything.
#[must_use]
pub fn cluster(extraction: &Extraction, clarifications: &mut Clarifications) -> Vec<Cluster> {
    if extraction.epic_names.is_empty() {
        let context = extraction
            .candidates
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default();
        clarifications.raise(
            "No feature name was stated; what should this epic be called?",
            context,
        );
        return vec![Cluster {
            name: UNNAMED_EPIC.to_string(),
            candidates: extraction.candidates.clone(),
        }];
    }

    let mut clusters: Vec<Cluster> = extraction
        .epic_names
        .iter()
        .map(|name| Cluster {
            name: name.clone(),
            candidates: Vec::new(),
        })
        .collect();

    let mut current = 0;
    for candidate in &extraction.candidates {
        if candidate.category == Category::EpicName {
            if let Some(name) = candidate.group("name").map(clean_epic_name) {
                if let Some(i) = clusters.iter().position(|c| c.name.eq_ignore_ascii_case(&name)) {
                    current = i;
                }
            }
        }
        clusters[current].candidates.push(candidate.clone());
    }
    clusters
}

/// Fold a cluster into epic requirements
pub fn reduce(
    cluster: &Cluster,
    config: &ScribeConfig,
    clarifications: &mut Clarifications,
) -> EpicRequirements {
    cluster
        .candidates
        .iter()
        .fold(EpicDraft::new(&cluster.name), EpicDraft::absorb)
        .finalize(config, clarifications)
}

#[derive(Debug, Clone)]
struct FieldDraft {
    name: String,
    field_type: Option<FieldType>,
    mandatory: Option<bool>,
    options: Vec<String>,
    context: String,
}

impl FieldDraft {
    /// Dropdown with options > explicit type > none
    fn specificity(&self) -> u8 {
        match self.field_type {
            Some(ty) if ty.has_options() && !self.options.is_empty() => 2,
            Some(_) => 1,
            None => 0,
        }
    }
}

#[derive(Debug)]
struct EpicDraft {
    name: String,
    description: Option<String>,
    priorities: Vec<(Priority, String)>,
    scopes: Vec<(Scope, String)>,
    tabs: Vec<String>,
    tab_context: Option<String>,
    columns: Vec<(ColumnSpec, String)>,
    tab_columns: IndexMap<String, Vec<(ColumnSpec, String)>>,
    table_refs: Vec<String>,
    search_context: Option<String>,
    fields: Vec<FieldDraft>,
    fields_at: Option<usize>,
    mandatory_conflicts: Vec<(String, String)>,
    stories: Vec<Story>,
    story_roles: Vec<(String, String)>,
    rbac: RbacMap,
    rbac_context: Option<String>,
    nav: Option<NavRequest>,
    search: SearchSpec,
    rules: Vec<Rule>,
    backend: Vec<String>,
    tech_notes: Vec<TechNote>,
}

impl EpicDraft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            priorities: Vec::new(),
            scopes: Vec::new(),
            tabs: Vec::new(),
            tab_context: None,
            columns: Vec::new(),
            tab_columns: IndexMap::new(),
            table_refs: Vec::new(),
            search_context: None,
            fields: Vec::new(),
            fields_at: None,
            mandatory_conflicts: Vec::new(),
            stories: Vec::new(),
            story_roles: Vec::new(),
            rbac: RbacMap::new(),
            rbac_context: None,
            nav: None,
            search: SearchSpec::default(),
            rules: Vec::new(),
            backend: Vec::new(),
            tech_notes: Vec::new(),
        }
    }

    fn absorb(mut self, c: &Candidate) -> Self {
        match c.category {
            Category::EpicName => {
                if self.description.is_none() && c.text.len() > 20 {
                    self.description = Some(c.text.clone());
                }
            }
            Category::UserStory => self.absorb_story(c),
            Category::DataField => self.absorb_field(c),
            Category::UiLayout => self.absorb_layout(c),
            Category::RbacRule => self.absorb_rbac(c),
            Category::BusinessRule => {
                self.rules.push(Rule {
                    text: c.group("rule").unwrap_or(&c.text).to_string(),
                    field: c.group("field").map(strip_article),
                    condition: c.group("condition").map(str::to_string),
                    unit: c.unit,
                    context: c.text.clone(),
                });
            }
            Category::TechnicalRequirement => {
                if c.captures.has("backend") {
                    push_unique_text(&mut self.backend, &c.text);
                } else if let Some(scope) = c.group("scope").and_then(Scope::from_signal) {
                    self.scopes.push((scope, c.text.clone()));
                } else if let Some(subject) = c.group("subject") {
                    self.tech_notes.push(TechNote {
                        subject: subject.to_ascii_lowercase(),
                        context: c.text.clone(),
                    });
                }
            }
            Category::PrioritySignal => {
                if let Some(level) = c.group("level").and_then(Priority::from_signal) {
                    self.priorities.push((level, c.text.clone()));
                }
            }
        }
        self
    }

    fn absorb_story(&mut self, c: &Candidate) {
        let actor = c.group("actor").unwrap_or_default().to_string();
        if let Some(role) = as_role(&actor) {
            self.story_roles.push((role, c.text.clone()));
        }
        self.stories.push(Story {
            actor,
            action: c.group("action").unwrap_or_default().to_string(),
            outcome: c.group("outcome").map(str::to_string),
            unit: c.unit,
            context: c.text.clone(),
        });
    }

    fn absorb_field(&mut self, c: &Candidate) {
        let drafts: Vec<FieldDraft> = if let Some(list) = c.group("list") {
            let flag = c.group("flag").and_then(mandatory_flag);
            split_items(list, &[" and ", " & "])
                .iter()
                .map(|item| {
                    let mut draft = parse_field_item(item, &c.text);
                    if draft.mandatory.is_none() {
                        draft.mandatory = flag;
                    }
                    draft
                })
                .filter(|d| !d.name.is_empty())
                .collect()
        } else if let Some(name) = c.group("name") {
            let field_type = c.group("type").and_then(FieldType::from_hint);
            let options = c
                .group("options")
                .map(|o| split_items(o, &[" and ", " or ", " & ", "/"]))
                .unwrap_or_default();
            vec![FieldDraft {
                name: capitalize(&strip_article(name)),
                field_type,
                mandatory: None,
                options,
                context: c.text.clone(),
            }]
        } else {
            Vec::new()
        };

        if !drafts.is_empty() {
            self.fields_at.get_or_insert(c.unit);
        }
        for draft in drafts {
            self.merge_field(draft);
        }
    }

    fn merge_field(&mut self, new: FieldDraft) {
        let Some(existing) = self
            .fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&new.name))
        else {
            self.fields.push(new);
            return;
        };

        if new.specificity() > existing.specificity() {
            existing.field_type = new.field_type;
            existing.options = new.options;
        }
        existing.mandatory = match (existing.mandatory, new.mandatory) {
            (Some(a), Some(b)) if a != b => {
                self.mandatory_conflicts
                    .push((existing.name.clone(), new.context.clone()));
                Some(true)
            }
            (old, new) => old.or(new),
        };
    }

    fn absorb_layout(&mut self, c: &Candidate) {
        if let Some(tabs) = c.group("tabs") {
            for tab in split_items(tabs, &[" and ", " & "]) {
                let tab = clean_tab(&tab);
                if !tab.is_empty() && !self.tabs.iter().any(|t| t.eq_ignore_ascii_case(&tab)) {
                    self.tabs.push(tab);
                }
            }
            self.tab_context.get_or_insert_with(|| c.text.clone());
        }
        if let Some(columns) = c.group("columns") {
            let lower = c.text.to_ascii_lowercase();
            let tab = self
                .tabs
                .iter()
                .find(|t| lower.contains(&format!("{} tab", t.to_ascii_lowercase())))
                .cloned();
            let target = match tab {
                Some(tab) => self.tab_columns.entry(tab).or_default(),
                None => &mut self.columns,
            };
            for item in split_items(columns, &[" and ", " & "]) {
                let column = parse_column(&item);
                if column.name.is_empty() {
                    continue;
                }
                match target
                    .iter_mut()
                    .find(|(col, _)| col.name.eq_ignore_ascii_case(&column.name))
                {
                    Some((col, _)) => {
                        if col.format.is_none() {
                            col.format = column.format;
                        }
                    }
                    None => target.push((column, c.text.clone())),
                }
            }
        }
        if c.captures.has("nav") {
            let parent = c.group("parent").map(str::to_string);
            match &mut self.nav {
                Some(existing) => {
                    if existing.parent.is_none() {
                        existing.parent = parent;
                    }
                }
                None => {
                    self.nav = Some(NavRequest {
                        parent,
                        context: c.text.clone(),
                    });
                }
            }
        }
        if let Some(search) = c.group("search") {
            extend_unique(&mut self.search.search_fields, split_items(search, &[" and ", " or "]));
            self.search_context.get_or_insert_with(|| c.text.clone());
        }
        if let Some(filter) = c.group("filter") {
            extend_unique(&mut self.search.filters, split_items(filter, &[" and ", " or "]));
            self.search_context.get_or_insert_with(|| c.text.clone());
        }
        if c.captures.has("table") {
            self.table_refs.push(c.text.clone());
        }
    }

    fn absorb_rbac(&mut self, c: &Candidate) {
        let Some(role) = c.group("role").map(normalize_role) else {
            return;
        };
        let action = c.group("action").unwrap_or_default();
        let action = if c.captures.has("deny") {
            format!("cannot {action}")
        } else if c.captures.has("only") {
            format!("{action} (exclusive)")
        } else {
            action.to_string()
        };
        let actions = self.rbac.entry(role).or_default();
        if !actions.contains(&action) {
            actions.push(action);
        }
        self.rbac_context.get_or_insert_with(|| c.text.clone());
    }

    fn finalize(self, config: &ScribeConfig, clar: &mut Clarifications) -> EpicRequirements {
        let name = self.name;

        for (field, context) in &self.mandatory_conflicts {
            clar.raise(
                format!("Field '{field}' in '{name}' is marked both mandatory and optional; it was kept as mandatory. Which is correct?"),
                context.clone(),
            );
        }

        let priority = strongest_priority(&name, &self.priorities, clar);
        let scope = chosen_scope(&name, &self.scopes, config.default_scope, clar);

        // Fields: untyped fields default to text
        let mut asked: HashSet<String> = HashSet::new();
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(self.fields.len());
        for draft in self.fields {
            let field_type = match draft.field_type {
                Some(ty) => ty,
                None => {
                    let hint = FieldType::suggest_for_name(&draft.name)
                        .filter(|t| *t != FieldType::TextField)
                        .map(|t| format!(" (the name suggests {t})"))
                        .unwrap_or_default();
                    clar.raise(
                        format!("Field '{}' in '{name}' has no declared type; defaulted to Text field{hint}. What type should it be?", draft.name),
                        draft.context.clone(),
                    );
                    asked.insert(draft.name.to_ascii_lowercase());
                    FieldType::TextField
                }
            };
            let condition = self
                .rules
                .iter()
                .find(|r| r.field.as_deref().is_some_and(|f| names_match(f, &draft.name)))
                .and_then(|r| r.condition.clone());
            fields.push(FieldSpec {
                name: draft.name,
                field_type,
                mandatory: draft.mandatory.unwrap_or(true),
                options: draft.options,
                condition,
            });
        }

        // Columns: exactly one question per unformatted column name
        let typed_fields: HashSet<String> = fields
            .iter()
            .map(|f| f.name.to_ascii_lowercase())
            .filter(|n| !asked.contains(n))
            .collect();
        let all_columns = self
            .columns
            .iter()
            .chain(self.tab_columns.values().flatten());
        for (column, context) in all_columns {
            let key = column.name.to_ascii_lowercase();
            if column.format.is_none() && !typed_fields.contains(&key) && asked.insert(key) {
                clar.raise(
                    format!("Column '{}' in '{name}' has no declared format; what should it display?", column.name),
                    context.clone(),
                );
            }
        }

        let tab_context = self.tab_context.clone().unwrap_or_default();
        if self.columns.is_empty() {
            for tab in &self.tabs {
                if !self.tab_columns.contains_key(tab) {
                    clar.raise(
                        format!("Which columns should the table in the '{tab}' tab of '{name}' show?"),
                        tab_context.clone(),
                    );
                }
            }
            if self.tabs.is_empty() {
                if let Some(context) = self.table_refs.first() {
                    clar.raise(
                        format!("A table is mentioned for '{name}' but no columns were declared; which columns should it show?"),
                        context.clone(),
                    );
                }
            }
        }

        // View and search tickets hang off tabs
        if self.tabs.is_empty() && (!self.columns.is_empty() || !self.search.is_empty()) {
            let context = self
                .columns
                .first()
                .map(|(_, ctx)| ctx.clone())
                .or_else(|| self.search_context.clone())
                .unwrap_or_default();
            clar.raise(
                format!("A table is described for '{name}' but no tab was named; which tabs should show it?"),
                context,
            );
        }

        if !self.tabs.is_empty() && self.search.is_empty() {
            clar.raise(
                format!("Which fields should be searchable and which filters should the tabs of '{name}' offer?"),
                tab_context,
            );
        }

        if self.rbac.is_empty() {
            if let Some((_, context)) = self.story_roles.first() {
                let roles = distinct(self.story_roles.iter().map(|(r, _)| r.as_str()));
                clar.raise(
                    format!("'{name}' mentions {} but states no access rules; which roles may view or change it?", roles.join(", ")),
                    context.clone(),
                );
            }
        } else {
            let missing: Vec<&str> = config
                .known_roles
                .iter()
                .filter(|r| !self.rbac.keys().any(|k| k.eq_ignore_ascii_case(r)))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                let covered: Vec<&str> = self.rbac.keys().map(String::as_str).collect();
                clar.raise(
                    format!(
                        "Access rules for '{name}' only cover {}; what may {} do?",
                        covered.join(", "),
                        missing.join(", ")
                    ),
                    self.rbac_context.clone().unwrap_or_default(),
                );
            }
        }

        EpicRequirements {
            description: self
                .description
                .unwrap_or_else(|| format!("Feature for {name}")),
            name,
            priority,
            scope,
            tabs: self.tabs,
            columns: self.columns.into_iter().map(|(c, _)| c).collect(),
            tab_columns: self
                .tab_columns
                .into_iter()
                .map(|(tab, cols)| (tab, cols.into_iter().map(|(c, _)| c).collect()))
                .collect(),
            fields,
            fields_at: self.fields_at,
            stories: self.stories,
            rbac: self.rbac,
            nav: self.nav,
            search: self.search,
            rules: self.rules,
            backend: self.backend,
            tech_notes: self.tech_notes,
        }
    }
}

fn strongest_priority(
    name: &str,
    signals: &[(Priority, String)],
    clar: &mut Clarifications,
) -> Option<Priority> {
    let strongest = signals.iter().map(|(p, _)| *p).max_by_key(|p| p.rank())?;
    let levels = distinct(signals.iter().map(|(p, _)| p.as_str()));
    if levels.len() > 1 {
        clar.raise(
            format!(
                "Conflicting priority signals for '{name}' ({}); {strongest} was used. Which is intended?",
                levels.join(", ")
            ),
            signals
                .iter()
                .map(|(_, ctx)| ctx.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
        );
    }
    Some(strongest)
}

fn chosen_scope(
    name: &str,
    signals: &[(Scope, String)],
    default: Scope,
    clar: &mut Clarifications,
) -> Scope {
    let Some((first, _)) = signals.first() else {
        return default;
    };
    if signals.iter().any(|(s, _)| s != first) {
        clar.raise(
            format!("Conflicting scope for '{name}'; {first} was used. Is it global or facility-specific?"),
            signals
                .iter()
                .map(|(_, ctx)| ctx.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
        );
    }
    *first
}

/// Split a spoken list on commas, semicolons and the given separators,
/// ignoring separators inside brackets
#[must_use]
pub fn split_items(text: &str, separators: &[&str]) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let Some(c) = rest.chars().next() else { break };
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            let sep_len = if c == ',' || c == ';' {
                Some(1)
            } else {
                separators
                    .iter()
                    .find(|sep| rest.get(..sep.len()).is_some_and(|s| s.eq_ignore_ascii_case(sep)))
                    .map(|sep| sep.len())
            };
            if let Some(len) = sep_len {
                push_item(&mut items, &text[start..i]);
                i += len;
                start = i;
                continue;
            }
        }
        i += c.len_utf8();
    }
    push_item(&mut items, &text[start..]);
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let mut item = raw.trim();
    for prefix in ["and ", "or ", "& "] {
        if item.get(..prefix.len()).is_some_and(|p| p.eq_ignore_ascii_case(prefix)) {
            item = item[prefix.len()..].trim_start();
        }
    }
    let item = item.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '!' | '?'));
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

/// `Patient Name (mandatory)`, `Notes (optional, large text)`, `dose - required`
fn parse_field_item(item: &str, context: &str) -> FieldDraft {
    let (name, annotations) = split_annotation(item);
    let mut draft = FieldDraft {
        name: capitalize(&strip_article(name)),
        field_type: None,
        mandatory: None,
        options: Vec::new(),
        context: context.to_string(),
    };
    for token in annotations.split([',', ';']).map(str::trim) {
        if let Some(flag) = mandatory_flag(token) {
            draft.mandatory = Some(flag);
        } else if let Some(ty) = FieldType::from_hint(token) {
            draft.field_type = Some(ty);
        } else if let Some(options) = token
            .split_once(':')
            .filter(|(k, _)| k.trim().eq_ignore_ascii_case("options"))
            .map(|(_, v)| v)
        {
            draft.options = split_items(options, &["/", " or "]);
        }
    }
    draft
}

fn parse_column(item: &str) -> ColumnSpec {
    let (name, format) = split_annotation(item);
    let name = name
        .trim()
        .trim_end_matches(" columns")
        .trim_end_matches(" column");
    let format = format.trim();
    ColumnSpec {
        name: capitalize(&strip_article(name)),
        format: (!format.is_empty()).then(|| format.to_string()),
    }
}

/// Split `name (annotation)` or `name - annotation`
fn split_annotation(item: &str) -> (&str, &str) {
    if let Some(open) = item.find('(') {
        let inner = &item[open + 1..];
        let inner = inner.rfind(')').map_or(inner, |close| &inner[..close]);
        return (item[..open].trim(), inner);
    }
    for sep in [" - ", " – ", " — "] {
        if let Some((name, annotation)) = item.split_once(sep) {
            return (name.trim(), annotation);
        }
    }
    (item.trim(), "")
}

fn mandatory_flag(word: &str) -> Option<bool> {
    match word.trim().to_ascii_lowercase().as_str() {
        "mandatory" | "required" | "all required" | "all mandatory" => Some(true),
        "optional" | "all optional" => Some(false),
        _ => None,
    }
}

fn clean_tab(raw: &str) -> String {
    let (name, _) = split_annotation(raw);
    let name = name
        .trim()
        .trim_end_matches(" tabs")
        .trim_end_matches(" tab")
        .trim_matches(|c: char| c == '"' || c == '\'');
    capitalize(&strip_article(name))
}

fn strip_article(raw: &str) -> String {
    let raw = raw.trim();
    for article in ["the ", "a ", "an "] {
        if raw.len() > article.len()
            && raw.get(..article.len()).is_some_and(|p| p.eq_ignore_ascii_case(article))
        {
            return raw[article.len()..].trim().to_string();
        }
    }
    raw.to_string()
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Nurses` -> `Nurse`, `administrators` -> `Admin`
#[must_use]
pub fn normalize_role(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    let singular = if lower.len() > 3 && lower.ends_with('s') && lower != "staff" {
        &lower[..lower.len() - 1]
    } else {
        lower.as_str()
    };
    match singular {
        "admin" | "administrator" => "Admin".to_string(),
        other => capitalize(other),
    }
}

fn as_role(actor: &str) -> Option<String> {
    let role = normalize_role(actor);
    let lower = role.to_ascii_lowercase();
    ROLE_WORDS.contains(&lower.as_str()).then_some(role)
}

fn names_match(rule_field: &str, field: &str) -> bool {
    let rule_field = rule_field.to_ascii_lowercase();
    let field = field.to_ascii_lowercase();
    rule_field == field || rule_field.ends_with(&format!(" {field}"))
}

fn push_unique_text(list: &mut Vec<String>, text: &str) {
    if !list.iter().any(|t| t == text) {
        list.push(text.to_string());
    }
}

fn extend_unique(list: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !list.iter().any(|t| t.eq_ignore_ascii_case(&item)) {
            list.push(item);
        }
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
