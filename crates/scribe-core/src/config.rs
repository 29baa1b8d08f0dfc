//! Pipeline configuration
//!
//! [`ScribeConfig`] carries the organisation conventions the pipeline applies:
//! project key, default menus and roles, and the per-type priority table.
//! It can be built in code or loaded from TOML:
//!
//! ```toml
//! project_key = "VDB"
//! known_roles = ["Nurse", "Doctor", "Admin"]
//! epic_count_threshold = 2
//!
//! [priority_defaults]
//! download = "Low"
//! ```

use crate::error::ConfigError;
use crate::types::{Priority, Scope, TicketType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default priority per ticket type
///
/// Interactive types default to High, bulk operations and edge cases to
/// Medium. Entries can be overridden individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, Priority>", into = "IndexMap<String, Priority>")]
pub struct PriorityTable {
    entries: IndexMap<TicketType, Priority>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        let entries = TicketType::ALL
            .into_iter()
            .map(|ty| {
                let priority = if ty.is_interactive() {
                    Priority::High
                } else {
                    Priority::Medium
                };
                (ty, priority)
            })
            .collect();
        Self { entries }
    }
}

impl PriorityTable {
    /// Default priority of a ticket type
    #[must_use]
    pub fn get(&self, ticket_type: TicketType) -> Priority {
        self.entries
            .get(&ticket_type)
            .copied()
            .unwrap_or(Priority::Medium)
    }

    /// Override one entry
    #[inline]
    #[must_use]
    pub fn with(mut self, ticket_type: TicketType, priority: Priority) -> Self {
        self.entries.insert(ticket_type, priority);
        self
    }

    /// All entries, in canonical type order
    pub fn iter(&self) -> impl Iterator<Item = (TicketType, Priority)> + '_ {
        self.entries.iter().map(|(t, p)| (*t, *p))
    }
}

impl TryFrom<IndexMap<String, Priority>> for PriorityTable {
    type Error = ConfigError;

    /// Overrides on top of the defaults; unknown type names are rejected
    fn try_from(raw: IndexMap<String, Priority>) -> Result<Self, Self::Error> {
        raw.into_iter().try_fold(Self::default(), |table, (name, priority)| {
            let ty = name
                .parse::<TicketType>()
                .map_err(|_| ConfigError::UnknownTicketType(name))?;
            Ok(table.with(ty, priority))
        })
    }
}

impl From<PriorityTable> for IndexMap<String, Priority> {
    fn from(table: PriorityTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(t, p)| (t.as_str().to_string(), p))
            .collect()
    }
}

/// Scribe configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScribeConfig {
    /// Tracker project key
    pub project_key: String,
    /// Tracker issue type for generated tickets
    pub issue_type: String,
    /// Default parent menu for navigation tickets
    pub nav_parent: String,
    /// Scope used when the transcript states none
    pub default_scope: Scope,
    /// Epic priority used when the transcript states none
    pub default_epic_priority: Priority,
    /// Roles whose access must be covered by RBAC rules
    pub known_roles: Vec<String>,
    /// Epic count above which a clarification is raised
    pub epic_count_threshold: usize,
    /// Per-type default ticket priority
    pub priority_defaults: PriorityTable,
}

impl Default for ScribeConfig {
    fn default() -> Self {
        Self {
            project_key: "VDB".to_string(),
            issue_type: "Story".to_string(),
            nav_parent: "Clinical".to_string(),
            default_scope: Scope::FacilitySpecific,
            default_epic_priority: Priority::Medium,
            known_roles: vec!["Nurse".to_string(), "Doctor".to_string(), "Admin".to_string()],
            epic_count_threshold: 2,
            priority_defaults: PriorityTable::default(),
        }
    }
}

impl ScribeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML, unknown keys, unknown
    /// priorities or unknown ticket types.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ScribeConfig::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), project = %config.project_key, "loaded configuration");
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// With project key
    #[inline]
    #[must_use]
    pub fn with_project_key(mut self, key: impl Into<String>) -> Self {
        self.project_key = key.into();
        self
    }

    /// With default navigation parent
    #[inline]
    #[must_use]
    pub fn with_nav_parent(mut self, parent: impl Into<String>) -> Self {
        self.nav_parent = parent.into();
        self
    }

    /// With known roles
    #[inline]
    #[must_use]
    pub fn with_known_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// With epic count threshold
    #[inline]
    #[must_use]
    pub fn with_epic_count_threshold(mut self, threshold: usize) -> Self {
        self.epic_count_threshold = threshold;
        self
    }

    /// With default epic priority
    #[inline]
    #[must_use]
    pub fn with_default_epic_priority(mut self, priority: Priority) -> Self {
        self.default_epic_priority = priority;
        self
    }

    /// With priority table
    #[inline]
    #[must_use]
    pub fn with_priority_defaults(mut self, table: PriorityTable) -> Self {
        self.priority_defaults = table;
        self
    }
}
