//! Shared types for Scribe Core

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for unknown owners and dates
pub const UNSPECIFIED: &str = "TBD";

/// Placeholder for unknown metadata values
pub const UNKNOWN: &str = "Unknown";

/// Raw transcript plus optional metadata
///
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    text: String,
    metadata: Option<MeetingMetadata>,
    source: Option<String>,
}

impl Transcript {
    /// Create transcript from raw text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
            source: None,
        }
    }

    /// With explicit metadata (skips header inference)
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: MeetingMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// With source name, usually the file path
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Raw text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Supplied metadata, if any
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> Option<&MeetingMetadata> {
        self.metadata.as_ref()
    }

    /// Source name, if any
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Meeting metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingMetadata {
    /// Meeting date, ISO `YYYY-MM-DD` when recognised
    pub date: String,
    /// Attendee names
    pub attendees: Vec<String>,
    /// Free-form duration
    #[serde(default = "unknown")]
    pub duration: String,
    /// Topics or agenda entries
    #[serde(default)]
    pub topics: Vec<String>,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

impl Default for MeetingMetadata {
    fn default() -> Self {
        Self {
            date: unknown(),
            attendees: Vec::new(),
            duration: unknown(),
            topics: Vec::new(),
        }
    }
}

impl MeetingMetadata {
    /// With date
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// With attendees
    #[inline]
    #[must_use]
    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    /// With duration
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Blockers and critical work
    Highest,
    /// Core feature work
    High,
    /// Supporting work
    Medium,
    /// Nice to have
    Low,
}

impl Priority {
    /// All levels, strongest first
    pub const ALL: [Priority; 4] = [Self::Highest, Self::High, Self::Medium, Self::Low];

    /// Strength rank, higher is more urgent
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Highest => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }

    /// Map priority language to a level
    ///
    /// Accepts level names and urgency words such as `critical`, `asap`,
    /// `important` or `nice to have`.
    #[must_use]
    pub fn from_signal(word: &str) -> Option<Self> {
        let word = word.trim().to_ascii_lowercase();
        let word = word.split_whitespace().collect::<Vec<_>>().join(" ");
        match word.as_str() {
            "highest" | "critical" | "urgent" | "asap" | "blocker" | "top" => Some(Self::Highest),
            "high" | "important" => Some(Self::High),
            "medium" | "normal" => Some(Self::Medium),
            "low" | "nice to have" | "can wait" => Some(Self::Low),
            _ => None,
        }
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Highest => "Highest",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown priority: {s}"))
    }
}

/// Rollout scope of an epic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scope {
    /// Configured per facility
    #[default]
    #[serde(rename = "facility-specific")]
    FacilitySpecific,
    /// Shared across all facilities
    #[serde(rename = "global")]
    Global,
}

impl Scope {
    /// Map scope language to a scope
    #[must_use]
    pub fn from_signal(phrase: &str) -> Option<Self> {
        let phrase = phrase.to_ascii_lowercase();
        if phrase.contains("global")
            || phrase.contains("all facilities")
            || phrase.contains("system")
        {
            Some(Self::Global)
        } else if phrase.contains("facility") {
            Some(Self::FacilitySpecific)
        } else {
            None
        }
    }

    /// Display name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FacilitySpecific => "facility-specific",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facility-specific" => Ok(Self::FacilitySpecific),
            "global" => Ok(Self::Global),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}

/// Fixed enumeration of ticket types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// Backend scaffold (model, service, controller, routes)
    BackendArchitecture,
    /// Role permissions
    RbacPermissions,
    /// Navigation menu entry
    NavMenu,
    /// Table view of one tab
    ViewTableData,
    /// Search and filter of one tab
    SearchFilter,
    /// Add-record form
    AddEntity,
    /// Row actions (edit, delete, approve...)
    PerformActions,
    /// Export
    Download,
    /// Bulk import
    UploadCsv,
    /// Deleted/archived data handling
    EdgeCases,
}

impl TicketType {
    /// All types, in canonical order
    pub const ALL: [TicketType; 10] = [
        Self::BackendArchitecture,
        Self::RbacPermissions,
        Self::NavMenu,
        Self::ViewTableData,
        Self::SearchFilter,
        Self::AddEntity,
        Self::PerformActions,
        Self::Download,
        Self::UploadCsv,
        Self::EdgeCases,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackendArchitecture => "backend_architecture",
            Self::RbacPermissions => "rbac_permissions",
            Self::NavMenu => "nav_menu",
            Self::ViewTableData => "view_table_data",
            Self::SearchFilter => "search_filter",
            Self::AddEntity => "add_entity",
            Self::PerformActions => "perform_actions",
            Self::Download => "download",
            Self::UploadCsv => "upload_csv",
            Self::EdgeCases => "edge_cases",
        }
    }

    /// Whether this is a bulk/export operation
    #[inline]
    #[must_use]
    pub fn is_bulk(self) -> bool {
        matches!(self, Self::Download | Self::UploadCsv)
    }

    /// Whether this is an interactive (non-bulk, non-edge-case) type
    #[inline]
    #[must_use]
    pub fn is_interactive(self) -> bool {
        !self.is_bulk() && self != Self::EdgeCases
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown ticket type: {s}"))
    }
}

/// Form field input type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Single-line text
    #[serde(rename = "Text field")]
    TextField,
    /// Multi-line expandable text
    #[serde(rename = "Large text")]
    LargeText,
    /// Single choice
    #[serde(rename = "Dropdown")]
    Dropdown,
    /// Multiple choice
    #[serde(rename = "Multi-select")]
    MultiSelect,
    /// Date
    #[serde(rename = "Date picker")]
    DatePicker,
    /// Time of day
    #[serde(rename = "Time picker")]
    TimePicker,
    /// Numeric input
    #[serde(rename = "Number")]
    Number,
    /// Boolean
    #[serde(rename = "Checkbox")]
    Checkbox,
    /// Email address
    #[serde(rename = "Email field")]
    Email,
    /// Phone number
    #[serde(rename = "Phone field")]
    Phone,
    /// Attachment
    #[serde(rename = "File upload")]
    FileUpload,
}

impl FieldType {
    /// All types
    pub const ALL: [FieldType; 11] = [
        Self::TextField,
        Self::LargeText,
        Self::Dropdown,
        Self::MultiSelect,
        Self::DatePicker,
        Self::TimePicker,
        Self::Number,
        Self::Checkbox,
        Self::Email,
        Self::Phone,
        Self::FileUpload,
    ];

    /// Display name, as used in ticket descriptions
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextField => "Text field",
            Self::LargeText => "Large text",
            Self::Dropdown => "Dropdown",
            Self::MultiSelect => "Multi-select",
            Self::DatePicker => "Date picker",
            Self::TimePicker => "Time picker",
            Self::Number => "Number",
            Self::Checkbox => "Checkbox",
            Self::Email => "Email field",
            Self::Phone => "Phone field",
            Self::FileUpload => "File upload",
        }
    }

    /// Map explicit type language such as `large text` or `date picker`
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.to_ascii_lowercase();
        let compact: String = hint.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        let ty = match compact.as_str() {
            "multiselect" => Self::MultiSelect,
            "dropdown" | "select" | "picklist" => Self::Dropdown,
            "datepicker" | "date" => Self::DatePicker,
            "timepicker" | "time" => Self::TimePicker,
            "datetime" | "datetimepicker" => Self::DatePicker,
            "textfield" | "textbox" | "text" | "shorttext" => Self::TextField,
            "largetext" | "textarea" | "freetext" | "longtext" | "largeexpandabletext" => {
                Self::LargeText
            }
            "number" | "numeric" | "numericfield" | "integer" | "decimal" => Self::Number,
            "checkbox" | "boolean" | "toggle" => Self::Checkbox,
            "email" | "emailfield" => Self::Email,
            "phone" | "phonefield" | "phonenumber" => Self::Phone,
            "fileupload" | "upload" | "attachment" => Self::FileUpload,
            _ => return None,
        };
        Some(ty)
    }

    /// Type suggested by a field name, when it hints at something other than text
    #[must_use]
    pub fn suggest_for_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| name.contains(w));
        if has(&["date", "dob", "birthday"]) {
            Some(Self::DatePicker)
        } else if has(&["time"]) {
            Some(Self::TimePicker)
        } else if has(&["email"]) {
            Some(Self::Email)
        } else if has(&["phone", "mobile"]) {
            Some(Self::Phone)
        } else if has(&["note", "comment", "instruction", "description", "reason"]) {
            Some(Self::LargeText)
        } else if has(&["status", "type", "frequency", "route", "category"]) {
            Some(Self::Dropdown)
        } else if has(&["count", "quantity", "amount", "dose", "number"]) {
            Some(Self::Number)
        } else {
            None
        }
    }

    /// Whether this type carries a list of options
    #[inline]
    #[must_use]
    pub fn has_options(self) -> bool {
        matches!(self, Self::Dropdown | Self::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field label
    pub name: String,
    /// Input type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be filled
    pub mandatory: bool,
    /// Choices for dropdown/multi-select fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Condition under which the field becomes mandatory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl FieldSpec {
    /// Create a mandatory text field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::TextField,
            mandatory: true,
            options: Vec::new(),
            condition: None,
        }
    }

    /// With type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// With mandatory flag
    #[inline]
    #[must_use]
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }
}

/// One table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column header
    pub name: String,
    /// Declared display format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ColumnSpec {
    /// Create column without a declared format
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: None,
        }
    }
}

/// Search and filter specification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    /// Fields covered by free-text search
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Filter names
    #[serde(default)]
    pub filters: Vec<String>,
}

impl SearchSpec {
    /// Whether nothing was specified
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_fields.is_empty() && self.filters.is_empty()
    }
}

/// Role name to permitted actions
pub type RbacMap = IndexMap<String, Vec<String>>;

/// Type-dependent ticket payload
///
/// Only the members relevant to the ticket type are populated; empty members
/// are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDetails {
    /// Tab the ticket belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_name: Option<String>,
    /// Table columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSpec>,
    /// Entity added or acted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// Form fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
    /// Role permissions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rbac: RbacMap,
    /// Search and filter spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSpec>,
    /// Parent menu of a navigation entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_parent: Option<String>,
    /// Business and validation rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    /// Source excerpts backing the ticket
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// One ticket draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket type
    pub ticket_type: TicketType,
    /// Summary line
    pub summary: String,
    /// Description body
    #[serde(default)]
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Type-dependent payload
    #[serde(default)]
    pub details: TicketDetails,
}

/// A named requirement group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    /// Epic name, the identity of the epic
    pub epic_name: String,
    /// Short description
    pub epic_description: String,
    /// Epic priority
    pub priority: Priority,
    /// Rollout scope
    pub scope: Scope,
    /// Section labels, in mention order
    pub tabs: Vec<String>,
    /// Tickets, in mapping order
    pub tickets: Vec<Ticket>,
}

impl Epic {
    /// Number of tickets of a type
    #[must_use]
    pub fn count_of(&self, ticket_type: TicketType) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.ticket_type == ticket_type)
            .count()
    }
}

/// Follow-up extracted from the meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    /// What to do
    pub item: String,
    /// Who does it, `TBD` when unknown
    pub owner: String,
    /// When it is due, `TBD` when unknown
    pub due_date: String,
}

impl ActionItem {
    /// Create action item with unspecified owner and date
    #[must_use]
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            owner: UNSPECIFIED.to_string(),
            due_date: UNSPECIFIED.to_string(),
        }
    }
}

/// Open question raised during extraction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clarification {
    /// The question for the reviewer
    pub question: String,
    /// Excerpt that triggered it
    pub context: String,
}

impl Clarification {
    /// Create clarification
    #[must_use]
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_signals() {
        assert_eq!(Priority::from_signal("Critical"), Some(Priority::Highest));
        assert_eq!(Priority::from_signal("important"), Some(Priority::High));
        assert_eq!(Priority::from_signal("nice  to have"), Some(Priority::Low));
        assert_eq!(Priority::from_signal("soon"), None);
        assert!(Priority::Highest.rank() > Priority::Low.rank());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert!("severe".parse::<Priority>().is_err());
    }

    #[test]
    fn scope_signals() {
        assert_eq!(Scope::from_signal("across all facilities"), Some(Scope::Global));
        assert_eq!(Scope::from_signal("per-facility"), Some(Scope::FacilitySpecific));
        assert_eq!(Scope::default(), Scope::FacilitySpecific);
    }

    #[test]
    fn ticket_type_wire_names() {
        for ty in TicketType::ALL {
            assert_eq!(ty.as_str().parse::<TicketType>(), Ok(ty));
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
        assert!(TicketType::Download.is_bulk());
        assert!(TicketType::AddEntity.is_interactive());
        assert!(!TicketType::EdgeCases.is_interactive());
    }

    #[test]
    fn field_type_hints() {
        assert_eq!(FieldType::from_hint("large text"), Some(FieldType::LargeText));
        assert_eq!(FieldType::from_hint("Drop-down"), Some(FieldType::Dropdown));
        assert_eq!(FieldType::from_hint("date picker"), Some(FieldType::DatePicker));
        assert_eq!(FieldType::from_hint("mandatory"), None);
        assert_eq!(FieldType::suggest_for_name("Start Date"), Some(FieldType::DatePicker));
        assert_eq!(FieldType::suggest_for_name("Patient Name"), None);
    }

    #[test]
    fn empty_details_serialize_to_empty_object() {
        let json = serde_json::to_string(&TicketDetails::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn field_type_serializes_display_name() {
        let field = FieldSpec::new("Notes").with_type(FieldType::LargeText);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "Large text");
        assert_eq!(json["mandatory"], true);
    }
}
