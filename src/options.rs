//! Compile Options
//!
//! Per-call configuration for rule compilation: culture, case sensitivity,
//! null guarding, indexer access and custom operators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coercion::Culture;
use crate::operators::{CustomOperator, OperatorRegistry};

/// Rule compilation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Culture used to parse numeric and date literals (default: invariant)
    #[serde(default)]
    pub culture: Culture,

    /// Convert offset-carrying date literals to UTC (default: false)
    #[serde(default)]
    pub parse_dates_as_utc: bool,

    /// Compare strings case-sensitively (default: false)
    #[serde(default)]
    pub string_case_sensitive: bool,

    /// Treat a null intermediate hop as "no match" instead of an
    /// evaluation error (default: false)
    #[serde(default)]
    pub null_check_nested_objects: bool,

    /// Recognize the indexer sentinel segment in paths (default: false)
    #[serde(default)]
    pub use_indexed_property: bool,

    /// Sentinel path segment for indexer access (default: "Item")
    #[serde(default = "default_indexed_property_name")]
    pub indexed_property_name: String,

    /// Reject string rules against non-text fields instead of rendering the
    /// field as text (default: false)
    #[serde(default)]
    pub require_explicit_to_string_conversion: bool,

    /// Caller-supplied operators; later registrations win
    #[serde(skip)]
    pub operators: Vec<Arc<dyn CustomOperator>>,
}

fn default_indexed_property_name() -> String {
    "Item".to_string()
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            culture: Culture::default(),
            parse_dates_as_utc: false,
            string_case_sensitive: false,
            null_check_nested_objects: false,
            use_indexed_property: false,
            indexed_property_name: default_indexed_property_name(),
            require_explicit_to_string_conversion: false,
            operators: Vec::new(),
        }
    }
}

impl CompileOptions {
    /// Load options from a JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn with_dates_as_utc(mut self, enabled: bool) -> Self {
        self.parse_dates_as_utc = enabled;
        self
    }

    pub fn with_case_sensitive_strings(mut self, enabled: bool) -> Self {
        self.string_case_sensitive = enabled;
        self
    }

    pub fn with_null_checks(mut self, enabled: bool) -> Self {
        self.null_check_nested_objects = enabled;
        self
    }

    /// Enable indexer access through the given sentinel segment
    pub fn with_indexed_property(mut self, name: impl Into<String>) -> Self {
        self.use_indexed_property = true;
        self.indexed_property_name = name.into();
        self
    }

    pub fn with_explicit_to_string(mut self, enabled: bool) -> Self {
        self.require_explicit_to_string_conversion = enabled;
        self
    }

    /// Register a custom operator
    pub fn with_operator(mut self, operator: impl CustomOperator + 'static) -> Self {
        self.operators.push(Arc::new(operator));
        self
    }

    /// Operator registry for these options
    pub fn registry(&self) -> OperatorRegistry<'_> {
        OperatorRegistry::new(&self.operators)
    }

    /// Indexer sentinel, when indexer access is enabled
    pub fn indexer_sentinel(&self) -> Option<&str> {
        self.use_indexed_property
            .then_some(self.indexed_property_name.as_str())
    }
}
