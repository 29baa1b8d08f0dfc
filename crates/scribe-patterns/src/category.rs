//! Requirement categories recognised by the pattern library

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a requirement candidate
///
/// Declaration order is the order categories are tried on each unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Name of a feature/epic
    EpicName,
    /// Actor + action (+ outcome) story
    UserStory,
    /// Form field or field list
    DataField,
    /// Tabs, table columns, navigation, search and filter layout
    UiLayout,
    /// Access-control rule for a role
    RbacRule,
    /// Validation or business rule
    BusinessRule,
    /// Backend, persistence or scope requirement
    TechnicalRequirement,
    /// Priority language
    PrioritySignal,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 8] = [
        Category::EpicName,
        Category::UserStory,
        Category::DataField,
        Category::UiLayout,
        Category::RbacRule,
        Category::BusinessRule,
        Category::TechnicalRequirement,
        Category::PrioritySignal,
    ];

    /// Stable kebab-case label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::EpicName => "epic-name",
            Category::UserStory => "user-story",
            Category::DataField => "data-field",
            Category::UiLayout => "ui-layout",
            Category::RbacRule => "rbac-rule",
            Category::BusinessRule => "business-rule",
            Category::TechnicalRequirement => "technical-requirement",
            Category::PrioritySignal => "priority-signal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
