//! Strict validation of re-ingested structured documents
//!
//! A hand-edited document is checked against the shape the pipeline writes
//! before it is deserialized. The first problem found is reported with its
//! JSON path; a document is never partially accepted.

use crate::document::StructuredDocument;
use crate::error::SchemaError;
use crate::types::{FieldType, Priority, Scope, TicketType};
use serde_json::{Map, Value};

/// Parse and validate document text
pub fn parse(text: &str) -> Result<StructuredDocument, SchemaError> {
    let value: Value = serde_json::from_str(text).map_err(|e| SchemaError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    validate(&value)?;
    serde_json::from_value(value).map_err(|e| SchemaError::InvalidValue {
        path: "$".to_string(),
        value: String::new(),
        expected: e.to_string(),
    })
}

/// Validate a parsed JSON value against the document shape
pub fn validate(value: &Value) -> Result<(), SchemaError> {
    let root = Node::root(value);
    root.object()?;

    let metadata = root.key("meeting_metadata")?;
    metadata.key("date")?.string()?;
    metadata.key("attendees")?.strings()?;
    if let Some(duration) = metadata.opt_key("duration")? {
        duration.string()?;
    }
    if let Some(topics) = metadata.opt_key("topics")? {
        topics.strings()?;
    }

    for epic in root.key("epics")?.items()? {
        validate_epic(&epic)?;
    }
    for item in root.key("action_items")?.items()? {
        for key in ["item", "owner", "due_date"] {
            item.key(key)?.string()?;
        }
    }
    for clarification in root.key("clarifications_needed")?.items()? {
        for key in ["question", "context"] {
            clarification.key(key)?.string()?;
        }
    }
    Ok(())
}

fn validate_epic(epic: &Node<'_>) -> Result<(), SchemaError> {
    let name = epic.key("epic_name")?;
    if name.string()?.trim().is_empty() {
        return Err(name.invalid("a non-empty name"));
    }
    epic.key("epic_description")?.string()?;
    epic.key("priority")?.one_of(&Priority::ALL.map(Priority::as_str))?;
    epic.key("scope")?.one_of(&[Scope::FacilitySpecific.as_str(), Scope::Global.as_str()])?;
    epic.key("tabs")?.strings()?;
    for ticket in epic.key("tickets")?.items()? {
        ticket.key("ticket_type")?.one_of(&TicketType::ALL.map(TicketType::as_str))?;
        ticket.key("summary")?.string()?;
        ticket.key("priority")?.one_of(&Priority::ALL.map(Priority::as_str))?;
        if let Some(description) = ticket.opt_key("description")? {
            description.string()?;
        }
        if let Some(details) = ticket.opt_key("details")? {
            validate_details(&details)?;
        }
    }
    Ok(())
}

fn validate_details(details: &Node<'_>) -> Result<(), SchemaError> {
    details.object()?;
    for key in ["tab_name", "entity_name", "nav_parent"] {
        if let Some(node) = details.opt_key(key)? {
            node.string()?;
        }
    }
    for key in ["rules", "notes"] {
        if let Some(node) = details.opt_key(key)? {
            node.strings()?;
        }
    }
    if let Some(columns) = details.opt_key("columns")? {
        for column in columns.items()? {
            column.key("name")?.string()?;
            if let Some(format) = column.opt_key("format")? {
                format.string()?;
            }
        }
    }
    if let Some(fields) = details.opt_key("fields")? {
        for field in fields.items()? {
            field.key("name")?.string()?;
            field.key("type")?.one_of(&FieldType::ALL.map(FieldType::as_str))?;
            field.key("mandatory")?.boolean()?;
            if let Some(options) = field.opt_key("options")? {
                options.strings()?;
            }
            if let Some(condition) = field.opt_key("condition")? {
                condition.string()?;
            }
        }
    }
    if let Some(rbac) = details.opt_key("rbac")? {
        for role in rbac.object()?.keys() {
            rbac.key(role)?.strings()?;
        }
    }
    if let Some(search) = details.opt_key("search")? {
        search.object()?;
        for key in ["search_fields", "filters"] {
            if let Some(node) = search.opt_key(key)? {
                node.strings()?;
            }
        }
    }
    Ok(())
}

/// A value and its JSON path
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: "$".to_string(),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path == "$" {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn wrong_type(&self, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            path: self.path.clone(),
            expected,
            found: type_name(self.value),
        }
    }

    fn invalid(&self, expected: impl Into<String>) -> SchemaError {
        SchemaError::InvalidValue {
            path: self.path.clone(),
            value: self.value.to_string(),
            expected: expected.into(),
        }
    }

    fn object(&self) -> Result<&'a Map<String, Value>, SchemaError> {
        self.value.as_object().ok_or_else(|| self.wrong_type("object"))
    }

    fn key(&self, key: &str) -> Result<Node<'a>, SchemaError> {
        self.opt_key(key)?.ok_or_else(|| SchemaError::MissingKey {
            path: self.child_path(key),
        })
    }

    fn opt_key(&self, key: &str) -> Result<Option<Node<'a>>, SchemaError> {
        Ok(self.object()?.get(key).map(|value| Node {
            value,
            path: self.child_path(key),
        }))
    }

    fn string(&self) -> Result<&'a str, SchemaError> {
        self.value.as_str().ok_or_else(|| self.wrong_type("string"))
    }

    fn boolean(&self) -> Result<bool, SchemaError> {
        self.value.as_bool().ok_or_else(|| self.wrong_type("boolean"))
    }

    fn items(&self) -> Result<Vec<Node<'a>>, SchemaError> {
        let array = self.value.as_array().ok_or_else(|| self.wrong_type("array"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{i}]", self.path),
            })
            .collect())
    }

    fn strings(&self) -> Result<(), SchemaError> {
        for item in self.items()? {
            item.string()?;
        }
        Ok(())
    }

    fn one_of(&self, allowed: &[&str]) -> Result<(), SchemaError> {
        let value = self.string()?;
        if allowed.contains(&value) {
            Ok(())
        } else {
            Err(self.invalid(format!("one of {}", allowed.join(", "))))
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "meeting_metadata": {
                "date": "2024-03-05",
                "attendees": ["Sarah", "Lee"],
                "duration": "30 min",
                "topics": []
            },
            "epics": [{
                "epic_name": "Medication Log",
                "epic_description": "Track administered medications",
                "priority": "High",
                "scope": "facility-specific",
                "tabs": ["Active"],
                "tickets": [
                    {
                        "ticket_type": "add_entity",
                        "summary": "User should be able to add a dose",
                        "description": "",
                        "priority": "High",
                        "details": {
                            "entity_name": "dose",
                            "fields": [{"name": "Dose", "type": "Number", "mandatory": true}],
                            "rbac": {"Nurse": ["view"]}
                        }
                    },
                    {
                        "ticket_type": "view_table_data",
                        "summary": "User should be able to view",
                        "priority": "Medium"
                    }
                ]
            }],
            "action_items": [{"item": "send mockups", "owner": "Sarah", "due_date": "Friday"}],
            "clarifications_needed": [{"question": "Which columns?", "context": "tabs"}]
        })
    }

    #[test]
    fn valid_document_parses() {
        let doc = parse(&valid().to_string()).unwrap();
        assert_eq!(doc.epics[0].tickets.len(), 2);
        assert_eq!(doc.epics[0].tickets[1].description, "");
    }

    #[test]
    fn optional_metadata_members_default() {
        let mut value = valid();
        let metadata = value["meeting_metadata"].as_object_mut().unwrap();
        metadata.remove("duration");
        metadata.remove("topics");
        let doc = parse(&value.to_string()).unwrap();
        assert_eq!(doc.meeting_metadata.duration, "Unknown");
    }

    #[test]
    fn missing_key_reports_path() {
        let mut value = valid();
        value["epics"][0]["tickets"][1]
            .as_object_mut()
            .unwrap()
            .remove("priority");
        let err = validate(&value).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingKey {
                path: "epics[0].tickets[1].priority".to_string()
            }
        );
    }

    #[test]
    fn wrong_type_reports_path() {
        let mut value = valid();
        value["meeting_metadata"]["attendees"] = json!("Sarah, Lee");
        assert_eq!(
            validate(&value).unwrap_err(),
            SchemaError::WrongType {
                path: "meeting_metadata.attendees".to_string(),
                expected: "array",
                found: "string",
            }
        );
    }

    #[test]
    fn enumerations_are_checked() {
        let mut value = valid();
        value["epics"][0]["priority"] = json!("Urgent");
        let err = validate(&value).unwrap_err();
        assert_eq!(err.path(), "epics[0].priority");
        assert!(matches!(err, SchemaError::InvalidValue { .. }));

        let mut value = valid();
        value["epics"][0]["tickets"][0]["details"]["fields"][0]["type"] = json!("Textbox");
        assert_eq!(
            validate(&value).unwrap_err().path(),
            "epics[0].tickets[0].details.fields[0].type"
        );

        let mut value = valid();
        value["epics"][0]["tickets"][0]["details"]["rbac"]["Nurse"] = json!([1]);
        assert_eq!(
            validate(&value).unwrap_err().path(),
            "epics[0].tickets[0].details.rbac.Nurse[0]"
        );
    }

    #[test]
    fn empty_epic_name_rejected() {
        let mut value = valid();
        value["epics"][0]["epic_name"] = json!("  ");
        assert_eq!(validate(&value).unwrap_err().path(), "epics[0].epic_name");
    }

    #[test]
    fn syntax_errors_carry_position() {
        let err = parse("{\n  \"epics\": [").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { line: 2, .. }));
        assert_eq!(err.path(), "");
    }

    #[test]
    fn root_must_be_object() {
        assert_eq!(
            validate(&json!([])).unwrap_err(),
            SchemaError::WrongType {
                path: "$".to_string(),
                expected: "object",
                found: "array",
            }
        );
    }
}
