//! Ordered matcher table keyed by category

use crate::category::Category;
use crate::defaults;
use crate::error::PatternError;
use crate::matcher::{Captures, Matcher, RegexMatcher};
use std::collections::BTreeMap;
use std::fmt;

/// A successful match of one matcher on one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    /// Category the matcher belongs to
    pub category: Category,
    /// Name of the matcher that fired
    pub matcher: &'a str,
    /// Captured values
    pub captures: Captures,
}

/// Ordered recognition rules for every requirement category
///
/// Matchers are tried in registration order; the first match wins. The
/// library is read-only once built and may be shared across threads.
pub struct PatternLibrary {
    categories: BTreeMap<Category, Vec<Box<dyn Matcher>>>,
    action_items: Vec<Box<dyn Matcher>>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatternLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(Category, usize)> = self
            .categories
            .iter()
            .map(|(c, m)| (*c, m.len()))
            .collect();
        f.debug_struct("PatternLibrary")
            .field("categories", &counts)
            .field("action_items", &self.action_items.len())
            .finish()
    }
}

impl PatternLibrary {
    /// Create an empty library
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: BTreeMap::new(),
            action_items: Vec::new(),
        }
    }

    /// Create a library holding the stock rules for every category
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a stock pattern fails to compile.
    pub fn with_defaults() -> Result<Self, PatternError> {
        let mut library = Self::new();
        for category in Category::ALL {
            for (name, pattern) in defaults::table(category) {
                library.register(category, RegexMatcher::new(*name, pattern)?)?;
            }
        }
        for (name, pattern) in defaults::ACTION_ITEM {
            library.register_action_item(RegexMatcher::new(*name, pattern)?)?;
        }
        Ok(library)
    }

    /// Append a matcher to a category
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::DuplicateMatcher`] if the category already
    /// holds a matcher with the same name.
    pub fn register<M: Matcher + 'static>(
        &mut self,
        category: Category,
        matcher: M,
    ) -> Result<(), PatternError> {
        let list = self.categories.entry(category).or_default();
        push_unique(list, Box::new(matcher))
    }

    /// Append an action-item matcher
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::DuplicateMatcher`] on a name clash.
    pub fn register_action_item<M: Matcher + 'static>(
        &mut self,
        matcher: M,
    ) -> Result<(), PatternError> {
        push_unique(&mut self.action_items, Box::new(matcher))
    }

    /// First matching rule of a category for a unit
    #[must_use]
    pub fn first_match(&self, category: Category, unit: &str) -> Option<PatternMatch<'_>> {
        let matchers = self.categories.get(&category)?;
        first_of(matchers, unit).map(|(matcher, captures)| PatternMatch {
            category,
            matcher,
            captures,
        })
    }

    /// First match of every category, in category order
    ///
    /// A unit yields at most one match per category.
    #[must_use]
    pub fn match_all(&self, unit: &str) -> Vec<PatternMatch<'_>> {
        Category::ALL
            .into_iter()
            .filter_map(|category| self.first_match(category, unit))
            .collect()
    }

    /// First matching action-item rule for a unit
    #[must_use]
    pub fn first_action_item(&self, unit: &str) -> Option<(&str, Captures)> {
        first_of(&self.action_items, unit)
    }

    /// Matcher names of a category, in trial order
    #[must_use]
    pub fn matcher_names(&self, category: Category) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|list| list.iter().map(|m| m.name()).collect())
            .unwrap_or_default()
    }

    /// Total number of registered matchers, action items included
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum::<usize>() + self.action_items.len()
    }

    /// Whether no matcher is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_unique(list: &mut Vec<Box<dyn Matcher>>, matcher: Box<dyn Matcher>) -> Result<(), PatternError> {
    if list.iter().any(|m| m.name() == matcher.name()) {
        return Err(PatternError::DuplicateMatcher(matcher.name().to_string()));
    }
    list.push(matcher);
    Ok(())
}

fn first_of<'a>(matchers: &'a [Box<dyn Matcher>], unit: &str) -> Option<(&'a str, Captures)> {
    matchers
        .iter()
        .find_map(|m| m.attempt(unit).map(|caps| (m.name(), caps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn library() -> PatternLibrary {
        PatternLibrary::with_defaults().unwrap()
    }

    fn group(lib: &PatternLibrary, category: Category, unit: &str, name: &str) -> Option<String> {
        lib.first_match(category, unit)
            .and_then(|m| m.captures.get(name).map(str::to_string))
    }

    #[test]
    fn defaults_compile_for_every_category() {
        let lib = library();
        for category in Category::ALL {
            assert!(!lib.matcher_names(category).is_empty(), "{category} has no rules");
        }
        assert!(!lib.is_empty());
    }

    #[test]
    fn library_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PatternLibrary>();
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut lib = PatternLibrary::new();
        lib.register(Category::EpicName, RegexMatcher::new("a", "x").unwrap())
            .unwrap();
        let err = lib
            .register(Category::EpicName, RegexMatcher::new("a", "y").unwrap())
            .unwrap_err();
        assert!(matches!(err, PatternError::DuplicateMatcher(ref n) if n == "a"));
        // Same name in another category is fine
        lib.register(Category::UserStory, RegexMatcher::new("a", "y").unwrap())
            .unwrap();
    }

    #[test]
    fn first_registered_rule_wins() {
        let mut lib = PatternLibrary::new();
        lib.register(Category::EpicName, RegexMatcher::new("first", r"(?P<name>\w+)").unwrap())
            .unwrap();
        lib.register(Category::EpicName, RegexMatcher::new("second", r"(?P<name>.+)").unwrap())
            .unwrap();
        let m = lib.first_match(Category::EpicName, "alpha beta").unwrap();
        assert_eq!(m.matcher, "first");
        assert_eq!(m.captures.get("name"), Some("alpha"));
    }

    #[test]
    fn epic_name_from_need_sentence() {
        let lib = library();
        assert_eq!(
            group(&lib, Category::EpicName, "We need a Medication Log with Active and History tabs", "name"),
            Some("Medication Log".to_string())
        );
        assert_eq!(
            group(&lib, Category::EpicName, "Epic: Wound Care", "name"),
            Some("Wound Care".to_string())
        );
        assert_eq!(
            group(&lib, Category::EpicName, "Let's talk about the design for the Vitals Chart feature", "name"),
            Some("Vitals Chart".to_string())
        );
    }

    #[test]
    fn tabs_from_with_phrase() {
        let lib = library();
        assert_eq!(
            group(&lib, Category::UiLayout, "We need a Medication Log with Active and History tabs", "tabs"),
            Some("Active and History".to_string())
        );
        assert_eq!(
            group(&lib, Category::UiLayout, "Tabs: Scheduled, PRN, Discontinued", "tabs"),
            Some("Scheduled, PRN, Discontinued".to_string())
        );
    }

    #[test]
    fn story_and_rbac_from_same_unit() {
        let lib = library();
        let unit = "Nurses should be able to view medications";
        let categories: Vec<Category> = lib.match_all(unit).iter().map(|m| m.category).collect();
        assert_eq!(categories, vec![Category::UserStory, Category::RbacRule]);
        assert_eq!(group(&lib, Category::RbacRule, unit, "role"), Some("Nurses".to_string()));
        assert_eq!(
            group(&lib, Category::UserStory, unit, "action"),
            Some("view medications".to_string())
        );
    }

    #[test]
    fn story_outcome_is_optional() {
        let lib = library();
        let m = lib
            .first_match(
                Category::UserStory,
                "As a nurse, I want to record a dose so that the chart stays current",
            )
            .unwrap();
        assert_eq!(m.matcher, "as-a-role");
        assert_eq!(m.captures.get("actor"), Some("nurse"));
        assert_eq!(m.captures.get("action"), Some("record a dose"));
        assert_eq!(m.captures.get("outcome"), Some("the chart stays current"));
    }

    #[test]
    fn field_list_and_typed_declaration() {
        let lib = library();
        assert_eq!(
            group(
                &lib,
                Category::DataField,
                "fields: Patient Name (mandatory), Notes (optional, large text)",
                "list"
            ),
            Some("Patient Name (mandatory), Notes (optional, large text)".to_string())
        );

        let m = lib
            .first_match(Category::DataField, "Route should be a dropdown with options: Oral, IV, Topical")
            .unwrap();
        assert_eq!(m.captures.get("name"), Some("Route"));
        assert_eq!(m.captures.get("type"), Some("dropdown"));
        assert_eq!(m.captures.get("options"), Some("Oral, IV, Topical"));
    }

    #[test]
    fn capture_with_flag() {
        let lib = library();
        let m = lib
            .first_match(Category::DataField, "We capture dose, route and time - all required")
            .unwrap();
        assert_eq!(m.captures.get("list"), Some("dose, route and time"));
        assert_eq!(m.captures.get("flag"), Some("required"));
        assert!(m.captures.has("all"));
    }

    #[test]
    fn search_and_filter_split() {
        let lib = library();
        let m = lib
            .first_match(Category::UiLayout, "Users can search by patient name and filter by date")
            .unwrap();
        assert_eq!(m.captures.get("search"), Some("patient name"));
        assert_eq!(m.captures.get("filter"), Some("date"));
    }

    #[test]
    fn nav_with_parent() {
        let lib = library();
        let m = lib
            .first_match(Category::UiLayout, "It should sit under the Clinical menu")
            .unwrap();
        assert_eq!(m.captures.get("parent"), Some("Clinical"));
        assert_eq!(m.captures.get("nav"), Some("menu"));
    }

    #[test]
    fn rbac_only_and_deny() {
        let lib = library();
        let m = lib
            .first_match(Category::RbacRule, "Only admins can delete entries")
            .unwrap();
        assert!(m.captures.has("only"));
        assert_eq!(m.captures.get("role"), Some("admins"));

        let m = lib
            .first_match(Category::RbacRule, "Nurses cannot approve orders")
            .unwrap();
        assert!(m.captures.has("deny"));
        assert_eq!(m.captures.get("action"), Some("approve orders"));
    }

    #[test]
    fn business_and_technical_rules() {
        let lib = library();
        let m = lib
            .first_match(Category::BusinessRule, "A reason is required when a dose is skipped")
            .unwrap();
        assert_eq!(m.captures.get("field"), Some("reason"));
        assert_eq!(m.captures.get("condition"), Some("a dose is skipped"));

        assert_eq!(
            group(&lib, Category::TechnicalRequirement, "Everything is stored in the database", "backend"),
            Some("stored".to_string())
        );
        assert_eq!(
            group(&lib, Category::TechnicalRequirement, "This applies across all facilities", "scope"),
            Some("across all facilities".to_string())
        );
    }

    #[test]
    fn priority_levels() {
        let lib = library();
        assert_eq!(
            group(&lib, Category::PrioritySignal, "This is high priority for the team", "level"),
            Some("high".to_string())
        );
        assert_eq!(
            group(&lib, Category::PrioritySignal, "Priority is critical", "level"),
            Some("critical".to_string())
        );
    }

    #[test]
    fn action_items() {
        let lib = library();
        let (name, caps) = lib.first_action_item("Action item: confirm dose units").unwrap();
        assert_eq!(name, "labelled");
        assert_eq!(caps.get("item"), Some("confirm dose units"));

        let (_, caps) = lib
            .first_action_item("Sarah will send the mockups by Friday")
            .unwrap();
        assert_eq!(caps.get("owner"), Some("Sarah"));
        assert_eq!(caps.get("task"), Some("send the mockups"));
        assert_eq!(caps.get("due"), Some("Friday"));

        let (name, caps) = lib.first_action_item("I'll draft the schema by Monday").unwrap();
        assert_eq!(name, "first-person");
        assert_eq!(caps.get("owner"), Some("I"));
    }

    #[test]
    fn plain_chatter_matches_nothing() {
        let lib = library();
        assert!(lib.match_all("Good morning everybody").is_empty());
        assert!(lib.first_action_item("Good morning everybody").is_none());
    }

    proptest! {
        #[test]
        fn matches_point_into_the_unit(unit in "\\PC{0,120}") {
            let lib = library();
            let found = lib.match_all(&unit);
            for pair in found.windows(2) {
                prop_assert!(pair[0].category < pair[1].category);
            }
            for m in &found {
                prop_assert_eq!(&unit[m.captures.span.clone()], m.captures.text.as_str());
                prop_assert!(lib.matcher_names(m.category).contains(&m.matcher));
                let first = lib.first_match(m.category, &unit);
                prop_assert_eq!(first.as_ref(), Some(m));
            }
        }
    }
}
