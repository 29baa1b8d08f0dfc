//! Scribe Pattern Library
//!
//! Ordered recognition rules that find requirement candidates in meeting
//! transcript text.
//!
//! # Core Concepts
//!
//! - [`Category`]: The eight requirement categories, in trial order
//! - [`Matcher`]: Core trait, "attempt a match on one unit of text"
//! - [`RegexMatcher`]: Built-in regular expression matcher
//! - [`PatternLibrary`]: Ordered matcher lists per category, first match wins
//!
//! # Capture groups
//!
//! | Category | Groups |
//! |---|---|
//! | epic-name | `name` |
//! | user-story | `actor`, `action`, `outcome`? |
//! | data-field | `list` (`flag`?, `all`?) or `name`, `type` (`options`?) |
//! | ui-layout | `tabs`, `columns`, `nav` (`parent`?), `search`, `filter` or `table` |
//! | rbac-rule | `role`, `action` (`only`?, `deny`?) |
//! | business-rule | `rule` (`field`?, `condition`?) |
//! | technical-requirement | `backend`, `scope` or `subject` |
//! | priority-signal | `level` |
//! | action items | `item` or `owner`, `task`, `due` |
//!
//! # Example
//!
//! ```rust
//! use scribe_patterns::{Category, PatternLibrary};
//!
//! let library = PatternLibrary::with_defaults()?;
//! let hit = library
//!     .first_match(Category::EpicName, "We need a Medication Log with two tabs")
//!     .expect("epic name");
//! assert_eq!(hit.captures.get("name"), Some("Medication Log"));
//! # Ok::<(), scribe_patterns::PatternError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod category;
mod defaults;
mod error;
mod library;
mod matcher;

pub use category::Category;
pub use error::PatternError;
pub use library::{PatternLibrary, PatternMatch};
pub use matcher::{Captures, Matcher, RegexMatcher};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
