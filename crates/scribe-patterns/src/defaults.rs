//! Stock recognition rules
//!
//! Each table is `(matcher name, pattern)` in declaration order. Consumers
//! read groups by name, never by position, so a pattern may be reworded
//! freely as long as it keeps its category's group names.

use crate::category::Category;

/// Role words recognised in access rules and stories
macro_rules! roles {
    () => {
        r"nurses?|doctors?|physicians?|clinicians?|admins?|administrators?|staff|managers?|pharmacists?|caregivers?|supervisors?|therapists?"
    };
}

/// Actors that may open a user story
macro_rules! actors {
    () => {
        concat!(roles!(), r"|users?|everyone|anyone")
    };
}

/// Verbs that turn a role sentence into a permission
macro_rules! permissions {
    () => {
        r"view|see|edit|delete|add|create|update|access|approve|modify|manage|read|remove|sign|discontinue|export|download|upload|print"
    };
}

/// Explicit field-type language
macro_rules! field_types {
    () => {
        r"multi-?select|drop-?down|select|date\s*picker|time\s*picker|date|time|text\s*field|text\s*box|large\s+text|text\s*area|free\s+text|number|numeric|checkbox|check\s+box|email|phone|file\s+upload|upload"
    };
}

/// Capitalised multi-word label, e.g. `Medication Log`
macro_rules! title {
    () => {
        r"[A-Z][A-Za-z0-9]*(?:\s+[A-Z][A-Za-z0-9]*)*"
    };
}

pub(crate) const EPIC_NAME: &[(&str, &str)] = &[
    (
        "epic-label",
        r"(?i:\b(?:epic|feature|module)(?:\s+name)?\s*:\s*)(?P<name>[^,.;:!?]+)",
    ),
    (
        "need-a-named-thing",
        concat!(
            r"(?i:\b(?:need|want|build|implement|develop|introduce|working\s+on)\s+(?:a|an|the)\s+(?:new\s+)?)",
            r"(?P<name>",
            title!(),
            r")",
            r"(?:\s+(?i:feature|module|system|page|screen|with|that|where|which|for|to|so)\b|\s*[,;:!?]|\s*$)",
        ),
    ),
    (
        "for-the-feature",
        concat!(
            r"(?i:\bfor\s+the\s+)(?P<name>",
            title!(),
            r")\s+(?i:feature|module|epic|screen|page)\b",
        ),
    ),
];

pub(crate) const USER_STORY: &[(&str, &str)] = &[
    (
        "as-a-role",
        r"(?i)\bas\s+an?\s+(?P<actor>[\w ]+?)\s*,\s*i\s+(?:want|need|would\s+like)\s+(?:to\s+)?(?P<action>.+?)(?:\s*,?\s+so\s+that\s+(?P<outcome>.+))?$",
    ),
    (
        "system-allows",
        r"(?i)\b(?:the\s+system|it|the\s+app(?:lication)?|the\s+page|the\s+screen)\s+(?:should|must|needs?\s+to|will)\s+(?:allow|enable|let)\s+(?P<actor>[\w ]+?)\s+(?:to\s+)?(?P<action>\w.+?)(?:\s*,?\s+so\s+that\s+(?P<outcome>.+))?$",
    ),
    (
        "actor-modal",
        concat!(
            r"(?i)\b(?P<actor>",
            actors!(),
            r")\s+(?:should\s+be\s+able\s+to|must\s+be\s+able\s+to|needs?\s+to\s+be\s+able\s+to|will\s+be\s+able\s+to|needs?\s+to|must|can|wants?\s+to|would\s+like\s+to)\s+",
            r"(?P<action>.+?)(?:\s*,?\s+so\s+that\s+(?P<outcome>.+))?$",
        ),
    ),
];

pub(crate) const DATA_FIELD: &[(&str, &str)] = &[
    (
        "typed-declaration",
        concat!(
            r"(?i)\b(?:the\s+)?(?P<name>[a-z][\w ]*?)\s+(?:field\s+)?(?:should|will|must|can|needs\s+to)\s+be\s+(?:an?\s+)?",
            r"(?P<type>",
            field_types!(),
            r")\b(?:\s+(?:field|input|picker))?",
            r"(?:\s*,?\s*(?:with\s+)?(?:options?|values?|choices)\s*(?:of|like|are|include)?\s*:?\s*(?P<options>.+))?$",
        ),
    ),
    (
        "field-list",
        r"(?i)\b(?:form\s+fields?|fields?|the\s+form)\s*(?:are|include|includes|should\s+include|will\s+include|should\s+be|for|:)\s*:?\s*(?P<list>.+)$",
    ),
    (
        "capture-with-flag",
        r"(?i)\b(?:capture|record|require|collect|need|track)\s+(?P<list>.+?)\s*[-–—:]\s*(?P<all>all\s+)?(?P<flag>required|mandatory|optional)\b",
    ),
    (
        "with-fields",
        r"(?i)\bwith\s+(?:the\s+)?fields?\s+(?:for\s+|like\s+|of\s+)?(?P<list>.+)$",
    ),
];

pub(crate) const UI_LAYOUT: &[(&str, &str)] = &[
    (
        "split-into-tabs",
        r"(?i)\b(?:split|divided|organi[sz]ed|broken)\s+into\s+(?:\w+\s+)?(?:tabs|sections)\s*:?\s*(?P<tabs>.+)$",
    ),
    (
        "tabs-label",
        r"(?i)\b(?:tabs|sections)\s*(?:are|will\s+be|should\s+be|:)\s*:?\s*(?P<tabs>.+)$",
    ),
    (
        "with-named-tabs",
        concat!(
            r"(?i:\b(?:with|has|have|into)\s+(?:(?:two|three|four|five|six|\d+)\s+)?)",
            r"(?P<tabs>",
            title!(),
            r"(?:(?:\s*,\s*(?i:and\s+)?|\s+(?i:and)\s+|\s*&\s*)",
            title!(),
            r")*)\s+(?i:tabs?)\b",
        ),
    ),
    (
        "columns",
        r"(?i)\bcolumns?\s*(?:(?:should\s+)?(?:are|include|includes|show|display|be|for|of|like|with)\b\s*:?|:)\s*(?P<columns>\w.*)$",
    ),
    (
        "table-showing",
        r"(?i)\btable\s+(?:showing|displaying|with)\s+(?P<columns>\w.*)$",
    ),
    (
        "nav-under-parent",
        concat!(
            r"(?i:\bunder\s+(?:the\s+)?)(?P<parent>",
            title!(),
            r")\s+(?P<nav>(?i:menu|navigation|nav|sidebar))\b",
        ),
    ),
    (
        "nav",
        r"(?i)\b(?P<nav>menu|navigation|nav\s*bar|nav\s+panel|sidebar|side\s*nav)\b",
    ),
    (
        "search-filter",
        r"(?i)\bsearch(?:able)?\s+(?:by|on|for)\s+(?P<search>.+?)(?:\s*,?\s*(?:and\s+)?filter(?:able|ed)?\s+by\s+(?P<filter>.+))?$",
    ),
    (
        "filter",
        r"(?i)\bfilter(?:able|ed)?\s+(?:by|on)\s+(?P<filter>.+)$",
    ),
    (
        "table",
        r"(?i)\b(?P<table>table|grid|list\s+view)\b",
    ),
];

pub(crate) const RBAC_RULE: &[(&str, &str)] = &[
    (
        "only-role",
        concat!(
            r"(?i)\b(?P<only>only)\s+(?:the\s+)?(?P<role>",
            roles!(),
            r")\s+(?:can|should|may|will|are\s+allowed\s+to)\s+(?:be\s+able\s+to\s+)?(?P<action>.+)$",
        ),
    ),
    (
        "role-denied",
        concat!(
            r"(?i)\b(?P<role>",
            roles!(),
            r")\s+(?P<deny>cannot|can't|can\s+not|should\s+not|shouldn't|must\s+not|may\s+not|are\s+not\s+allowed\s+to)\s+(?:be\s+able\s+to\s+)?",
            r"(?P<action>(?:",
            permissions!(),
            r")\b.*)$",
        ),
    ),
    (
        "role-allowed",
        concat!(
            r"(?i)\b(?P<role>",
            roles!(),
            r")\s+(?:can|should\s+be\s+able\s+to|must\s+be\s+able\s+to|will\s+be\s+able\s+to|need\s+to\s+be\s+able\s+to|may|are\s+allowed\s+to)\s+",
            r"(?P<action>(?:",
            permissions!(),
            r")\b.*)$",
        ),
    ),
];

pub(crate) const BUSINESS_RULE: &[(&str, &str)] = &[
    (
        "should-not-allow",
        r"(?i)\b(?:should\s+not\s+allow|shouldn't\s+allow|must\s+not\s+allow|don't\s+allow|do\s+not\s+allow|disallow|prevent(?:s|ing)?|block(?:s|ing)?)\s+(?P<rule>.+)$",
    ),
    (
        "required-when",
        r"(?i)\b(?P<rule>(?:the\s+|a\s+|an\s+)?(?P<field>[a-z][\w ]*?)\s+(?:is\s+|should\s+be\s+|must\s+be\s+)?(?:required|mandatory)\s+(?:when|if|only\s+if)\s+(?P<condition>.+))$",
    ),
    (
        "only-if",
        r"(?i)\b(?P<rule>only\s+(?:if|when)\s+.+)$",
    ),
    (
        "value-constraint",
        r"(?i)\b(?P<rule>(?:[\w ]+?\s+)?(?:must|should|cannot|can't|can\s+not)\s+(?:not\s+)?(?:be\s+)?(?:unique|duplicated?|negative|empty|blank|in\s+the\s+(?:past|future)|exceed|more\s+than|less\s+than|before|after)\b.*)$",
    ),
    (
        "inactive-data",
        r"(?i)(?P<rule>.*\b(?:deleted|archived|discontinued|inactive|expired)\s+(?:records?|entries|items|data|medications?|patients?|orders?|rows?)\b.*)$",
    ),
];

pub(crate) const TECHNICAL_REQUIREMENT: &[(&str, &str)] = &[
    (
        "backend",
        r"(?i)\b(?P<backend>back[\s-]?end|database|db\s+tables?|persist(?:ed|ence)?|stor(?:e|ed|age)|saved?\s+to|api|endpoints?|schema|data\s+model)\b",
    ),
    (
        "scope",
        r"(?i)\b(?P<scope>global(?:ly)?|across\s+all\s+facilities|all\s+facilities|system[\s-]wide|facility[\s-]specific|per[\s-]facility|each\s+facility|specific\s+to\s+(?:the\s+|each\s+)?facility)\b",
    ),
    (
        "subject",
        r"(?i)\b(?P<subject>audit\s+(?:log|trail)|notifications?|alerts?|integration|sync(?:hroni[sz]ation)?|hl7|fhir|reporting|encryption|logging)\b",
    ),
];

pub(crate) const PRIORITY_SIGNAL: &[(&str, &str)] = &[
    (
        "priority-is",
        r"(?i)\bpriority\s*(?:is|should\s+be|will\s+be|:)\s*(?P<level>highest|high|medium|low|critical|urgent)\b",
    ),
    (
        "level-priority",
        r"(?i)\b(?P<level>highest|high|medium|low|top)[\s-]+priority\b",
    ),
    (
        "urgency-word",
        r"(?i)\b(?P<level>critical|urgent|asap|blocker|important|nice\s+to\s+have|can\s+wait)\b",
    ),
];

pub(crate) const ACTION_ITEM: &[(&str, &str)] = &[
    (
        "labelled",
        r"(?i)^\s*(?:action\s+items?|todo|to-do|task|follow[\s-]?up)\s*:\s*(?P<item>.+)$",
    ),
    (
        "first-person",
        r"^(?P<owner>I)(?:\s+(?i:will|am\s+going\s+to)|'ll|’ll)\s+(?P<task>.+?)\s+(?i:by|before|until)\s+(?P<due>.+)$",
    ),
    (
        "owner-will",
        r"^(?P<owner>[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s+(?i:will|to|is\s+going\s+to|needs?\s+to)\s+(?P<task>.+?)\s+(?i:by|before|until)\s+(?P<due>.+)$",
    ),
];

/// Table for a category
pub(crate) fn table(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::EpicName => EPIC_NAME,
        Category::UserStory => USER_STORY,
        Category::DataField => DATA_FIELD,
        Category::UiLayout => UI_LAYOUT,
        Category::RbacRule => RBAC_RULE,
        Category::BusinessRule => BUSINESS_RULE,
        Category::TechnicalRequirement => TECHNICAL_REQUIREMENT,
        Category::PrioritySignal => PRIORITY_SIGNAL,
    }
}
