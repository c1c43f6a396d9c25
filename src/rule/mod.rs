//! Rule tree: the declarative filter input
//!
//! A rule is either a group (child rules joined by AND/OR) or a leaf
//! (field, operator, declared type, value). A rule with neither children
//! nor a field is vacuous and matches every record.
//!
//! Rules deserialize from the usual query-builder JSON shape:
//!
//! ```json
//! { "condition": "AND", "rules": [
//!     { "field": "Age", "operator": "greater", "type": "integer", "value": 21 }
//! ] }
//! ```
//!
//! PascalCase member names (`Condition`, `Field`, ...) are accepted too.

mod types;

pub use types::DeclaredType;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Combinator for the children of a group rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    /// All children must match
    #[default]
    And,
    /// At least one child must match
    Or,
}

impl Condition {
    /// Returns the canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::And => "AND",
            Condition::Or => "OR",
        }
    }
}

impl TryFrom<String> for Condition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Condition::And),
            "or" => Ok(Condition::Or),
            other => Err(format!("unknown condition '{other}', expected AND or OR")),
        }
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the filter tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Combinator for `rules`; ignored on leaves
    #[serde(default, alias = "Condition")]
    pub condition: Condition,

    /// Dotted field path; absent on groups
    #[serde(default, alias = "Field", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Declared type tag; leaves without one are treated as `string`
    #[serde(
        default,
        rename = "type",
        alias = "Type",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_tag: Option<String>,

    /// Operator identifier
    #[serde(default, alias = "Operator", skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// Literal payload: scalar, delimited string or array
    #[serde(default, alias = "Value", skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,

    /// Child rules; empty for leaves
    #[serde(default, alias = "Rules", skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
}

impl Rule {
    /// Create a leaf rule without type or value
    pub fn new(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator.into()),
            ..Default::default()
        }
    }

    /// Create a leaf rule with a declared type and value
    pub fn leaf(
        field: impl Into<String>,
        operator: impl Into<String>,
        type_tag: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        Self::new(field, operator)
            .with_type(type_tag)
            .with_value(value)
    }

    /// Create a group rule
    pub fn group(condition: Condition, rules: Vec<Rule>) -> Self {
        Self {
            condition,
            rules,
            ..Default::default()
        }
    }

    /// Create an AND group
    pub fn and(rules: Vec<Rule>) -> Self {
        Self::group(Condition::And, rules)
    }

    /// Create an OR group
    pub fn or(rules: Vec<Rule>) -> Self {
        Self::group(Condition::Or, rules)
    }

    /// Set the declared type tag
    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Set the literal value
    pub fn with_value(mut self, value: impl Into<JsonValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Parse a rule tree from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns true if this rule has children
    pub fn is_group(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Returns true if this rule has neither children nor a field
    pub fn is_vacuous(&self) -> bool {
        self.rules.is_empty() && self.field_path().is_empty()
    }

    /// Field path, or "" when absent
    pub fn field_path(&self) -> &str {
        self.field.as_deref().map(str::trim).unwrap_or("")
    }

    /// Operator identifier, or "" when absent
    pub fn operator_name(&self) -> &str {
        self.operator.as_deref().map(str::trim).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_query_builder_json() {
        let rule = Rule::from_json(
            r#"{
                "condition": "OR",
                "rules": [
                    { "id": "age", "field": "Age", "type": "integer", "input": "number",
                      "operator": "between", "value": [18, 30] },
                    { "field": "Name", "type": "string", "operator": "is_null", "value": null }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(rule.condition, Condition::Or);
        assert!(rule.is_group());
        assert_eq!(rule.rules[0].field_path(), "Age");
        assert_eq!(rule.rules[0].type_tag.as_deref(), Some("integer"));
        assert_eq!(rule.rules[0].value, Some(json!([18, 30])));
        assert_eq!(rule.rules[1].value, None);
    }

    #[test]
    fn test_deserialize_pascal_case() {
        let rule: Rule = serde_json::from_value(json!({
            "Field": "ContentTypeId",
            "Operator": "in",
            "Type": "integer",
            "Value": [1, 2]
        }))
        .unwrap();

        assert_eq!(rule.field_path(), "ContentTypeId");
        assert_eq!(rule.operator_name(), "in");
        assert!(!rule.is_group());
    }

    #[test]
    fn test_condition_is_case_insensitive() {
        let rule: Rule = serde_json::from_value(json!({"condition": "or", "rules": []})).unwrap();
        assert_eq!(rule.condition, Condition::Or);

        let bad = serde_json::from_value::<Rule>(json!({"condition": "xor"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_vacuous_rule() {
        assert!(Rule::default().is_vacuous());
        assert!(Rule::and(vec![]).is_vacuous());
        assert!(!Rule::new("Age", "is_null").is_vacuous());
    }

    #[test]
    fn test_serialize_skips_empty_members() {
        let json = serde_json::to_value(Rule::leaf("Age", "equal", "integer", 5)).unwrap();
        assert_eq!(
            json,
            json!({"condition": "AND", "field": "Age", "type": "integer", "operator": "equal", "value": 5})
        );
    }
}
